#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::parse_max_tokens;
use crate::domain::models::ApiProvider;
use crate::domain::models::MAX_TOKENS_LIMIT;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiKey,
    ApiUrl,
    ConfigFile,
    DownloadDir,
    ImageRetention,
    InstructionsFile,
    MaxTokens,
    Model,
    Provider,
    RequestTimeout,
    Screenshot,
    SystemPromptSuffix,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default_config_path() -> path::PathBuf {
        #[cfg(not(target_os = "macos"))]
        let config_dir = dirs::config_dir();
        #[cfg(target_os = "macos")]
        let config_dir = dirs::home_dir().map(|e| return e.join(".config"));

        return config_dir
            .unwrap_or_else(|| return path::PathBuf::from("."))
            .join("clickstep/config.toml");
    }

    pub fn default(key: ConfigKey) -> String {
        let max_tokens = MAX_TOKENS_LIMIT.to_string();
        let provider = ApiProvider::Bedrock.to_string();
        let config_path = Config::default_config_path().to_string_lossy().to_string();

        let res: &str = match key {
            ConfigKey::ApiKey => "",
            ConfigKey::ApiUrl => "",
            ConfigKey::DownloadDir => ".",
            ConfigKey::ImageRetention => "10",
            ConfigKey::InstructionsFile => "instructions.txt",
            ConfigKey::MaxTokens => &max_tokens,
            ConfigKey::Model => "anthropic.claude-3-5-sonnet-20241022-v2:0",
            ConfigKey::Provider => &provider,
            ConfigKey::RequestTimeout => "120000",
            ConfigKey::SystemPromptSuffix => "This is a mac device",

            // Special
            ConfigKey::ConfigFile => &config_path,
            ConfigKey::Screenshot => "",
        };

        return res.to_string();
    }

    fn possible_values(cmd: &Command, key: ConfigKey) -> Vec<String> {
        let name = key.to_string();
        return cmd
            .get_arguments()
            .find(|e| return e.get_long() == Some(name.as_str()))
            .map(|arg| {
                return arg
                    .get_possible_values()
                    .iter()
                    .map(|e| return e.get_name().to_string())
                    .collect::<Vec<String>>();
            })
            .unwrap_or_default();
    }

    fn validate() -> Result<()> {
        parse_max_tokens(&Config::get(ConfigKey::MaxTokens))?;

        let retention = Config::get(ConfigKey::ImageRetention);
        // Zero keeps no images at all.
        if retention.parse::<usize>().is_err() {
            bail!(format!(
                "Image retention must be zero or a positive number, got {retention}"
            ));
        }

        let timeout = Config::get(ConfigKey::RequestTimeout);
        if !timeout.parse::<u64>().is_ok_and(|e| return e > 0) {
            bail!(format!(
                "Request timeout must be a positive number of milliseconds, got {timeout}"
            ));
        }

        return Ok(());
    }

    /// Layers defaults, the TOML config file, and then CLI arguments and
    /// environment variables, in that order.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let possible_values = Config::possible_values(&cmd, key);

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("{config_file} has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        Config::validate()?;

        tracing::debug!(
            provider = Config::get(ConfigKey::Provider),
            model = Config::get(ConfigKey::Model),
            max_tokens = Config::get(ConfigKey::MaxTokens),
            instructions_file = Config::get(ConfigKey::InstructionsFile),
            download_dir = Config::get(ConfigKey::DownloadDir),
            "config"
        );

        return Ok(());
    }

    /// A documented config file holding every default. Keys without a default
    /// are left commented out.
    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile || key == ConfigKey::Screenshot {
                    return None;
                }

                let name = key.to_string();
                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(name.as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default();
                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let possible_values = Config::possible_values(&cmd, key);
                if !possible_values.is_empty() {
                    description = format!(
                        "{description} [possible values: {}]",
                        possible_values.join(", ")
                    );
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
