#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;

use std::env;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::retain_recent_images;
use crate::domain::models::AgentEvent;
use crate::domain::models::ApiProvider;
use crate::domain::models::ContentBlock;
use crate::domain::models::MessageParam;
use crate::domain::models::RunRequest;
use crate::domain::models::SamplingLoop;
use crate::domain::models::ToolResult;

pub const ANTHROPIC_URL: &str = "https://api.anthropic.com";
pub const BEDROCK_URL: &str = "https://bedrock-runtime.us-east-1.amazonaws.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const BEDROCK_VERSION: &str = "bedrock-2023-05-31";

const SYSTEM_PROMPT: &str = "You are looking at screenshots of a computer screen, helping a user \
complete tasks on it. Describe what you see and what the user should do next. Screen control \
tools are not available in this session.";

#[derive(Debug, Clone, PartialEq, Serialize)]
struct MessagesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    anthropic_version: Option<String>,
    max_tokens: u32,
    system: String,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

fn system_prompt(suffix: &str) -> String {
    if suffix.trim().is_empty() {
        return SYSTEM_PROMPT.to_string();
    }

    return format!("{SYSTEM_PROMPT} {}", suffix.trim());
}

/// A single turn of the Messages API, served either by Anthropic directly or
/// through Bedrock. Tool use requests are answered with an error result.
pub struct MessagesLoop {
    provider: ApiProvider,
    url: String,
    api_key: String,
    timeout: String,
}

impl MessagesLoop {
    pub fn new(provider: ApiProvider) -> MessagesLoop {
        let mut url = Config::get(ConfigKey::ApiUrl);
        if url.is_empty() {
            url = match provider {
                ApiProvider::Bedrock => BEDROCK_URL.to_string(),
                _ => ANTHROPIC_URL.to_string(),
            };
        }

        return MessagesLoop {
            provider,
            url,
            api_key: Config::get(ConfigKey::ApiKey),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }

    /// Credentials from the request win, then the configured key, then the
    /// provider's usual environment variable.
    fn resolve_api_key(&self, request: &RunRequest) -> String {
        if !request.api_key.is_empty() {
            return request.api_key.to_string();
        }

        if !self.api_key.is_empty() {
            return self.api_key.to_string();
        }

        let env_key = match self.provider {
            ApiProvider::Bedrock => "AWS_BEARER_TOKEN_BEDROCK",
            _ => "ANTHROPIC_API_KEY",
        };

        return env::var(env_key).unwrap_or_default();
    }

    fn build_request(&self, request: &RunRequest) -> MessagesRequest {
        let mut messages = request.messages.clone();
        retain_recent_images(&mut messages, request.only_n_most_recent_images);

        let mut req = MessagesRequest {
            model: Some(request.model.to_string()),
            anthropic_version: None,
            max_tokens: request.max_tokens,
            system: system_prompt(&request.system_prompt_suffix),
            messages,
        };

        if self.provider == ApiProvider::Bedrock {
            req.model = None;
            req.anthropic_version = Some(BEDROCK_VERSION.to_string());
        }

        return req;
    }
}

#[async_trait]
impl SamplingLoop for MessagesLoop {
    fn provider(&self) -> ApiProvider {
        return self.provider;
    }

    #[allow(clippy::implicit_return)]
    async fn sample<'a>(
        &self,
        request: RunRequest,
        tx: &'a mpsc::UnboundedSender<AgentEvent>,
    ) -> Result<Vec<MessageParam>> {
        let api_key = self.resolve_api_key(&request);
        if api_key.is_empty() {
            bail!("No API key is configured for {}", self.provider);
        }

        let req = self.build_request(&request);
        let client = reqwest::Client::new();
        let builder = match self.provider {
            ApiProvider::Bedrock => client
                .post(format!(
                    "{url}/model/{model}/invoke",
                    url = self.url,
                    model = request.model
                ))
                .bearer_auth(&api_key),
            _ => client
                .post(format!("{url}/v1/messages", url = self.url))
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
        };

        let res = builder
            .header("content-type", "application/json")
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .json(&req)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Failed to make Messages API request"
            );
            bail!(
                "{} returned {}: {}",
                self.provider,
                status.as_u16(),
                body.trim()
            );
        }

        let body = res.text().await?;
        tx.send(AgentEvent::ApiResponse(body.to_string()))?;

        let response: MessagesResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            blocks = response.content.len(),
            stop_reason = ?response.stop_reason,
            "Messages API response"
        );

        let mut tool_results: Vec<ContentBlock> = vec![];
        for block in response.content.iter() {
            tx.send(AgentEvent::Output(block.clone()))?;

            if let ContentBlock::ToolUse { id, name, .. } = block {
                let error = format!("Tool {name} is not available");
                tx.send(AgentEvent::ToolOutput(
                    ToolResult::with_error(&error),
                    id.to_string(),
                ))?;
                tool_results.push(ContentBlock::ToolResult {
                    tool_use_id: id.to_string(),
                    content: vec![ContentBlock::Text { text: error }],
                    is_error: true,
                });
            }
        }

        let mut messages = request.messages;
        messages.push(MessageParam::assistant(response.content));
        if !tool_results.is_empty() {
            messages.push(MessageParam::user_blocks(tool_results));
        }

        return Ok(messages);
    }
}
