#[cfg(test)]
#[path = "run_request_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;

use super::ApiProvider;
use super::MessageParam;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const MAX_TOKENS_LIMIT: u32 = 4096;

/// Everything the sampling loop needs for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRequest {
    pub model: String,
    pub provider: ApiProvider,
    pub system_prompt_suffix: String,
    pub messages: Vec<MessageParam>,
    /// Always empty. Credentials are resolved by the sampling loop.
    pub api_key: String,
    pub only_n_most_recent_images: usize,
    pub max_tokens: u32,
}

/// The configuration panel: settings shared by every run of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSettings {
    pub model: String,
    pub provider: ApiProvider,
    pub system_prompt_suffix: String,
    pub only_n_most_recent_images: usize,
    pub max_tokens: u32,
}

impl RunSettings {
    pub fn from_config() -> Result<RunSettings> {
        let provider_name = Config::get(ConfigKey::Provider);
        let provider = ApiProvider::parse(provider_name.to_string())
            .ok_or_else(|| return anyhow!("Unknown provider {provider_name}"))?;

        return Ok(RunSettings {
            model: Config::get(ConfigKey::Model),
            provider,
            system_prompt_suffix: Config::get(ConfigKey::SystemPromptSuffix),
            only_n_most_recent_images: Config::get(ConfigKey::ImageRetention).parse::<usize>()?,
            max_tokens: parse_max_tokens(&Config::get(ConfigKey::MaxTokens))?,
        });
    }

    pub fn request(&self, messages: Vec<MessageParam>) -> RunRequest {
        return RunRequest {
            model: self.model.to_string(),
            provider: self.provider,
            system_prompt_suffix: self.system_prompt_suffix.to_string(),
            messages,
            api_key: "".to_string(),
            only_n_most_recent_images: self.only_n_most_recent_images,
            max_tokens: self.max_tokens,
        };
    }
}

pub fn parse_max_tokens(text: &str) -> Result<u32> {
    let max_tokens = text.trim().parse::<u32>()?;
    if max_tokens < 1 || max_tokens > MAX_TOKENS_LIMIT {
        bail!("Max tokens must be between 1 and {MAX_TOKENS_LIMIT}, got {max_tokens}");
    }

    return Ok(max_tokens);
}
