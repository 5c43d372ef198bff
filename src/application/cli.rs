#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiProvider;
use crate::domain::models::Frontend;
use crate::domain::models::InstructionStore;
use crate::domain::models::MAX_TOKENS_LIMIT;
use crate::infrastructure::stores::FileInstructionStore;

/// What to start once the command line has been handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Launch {
    Tui(Frontend),
    Once(String),
}

pub fn help_text() -> String {
    let text = r#"
STEPS HOTKEYS:
- Enter: Run the current step.
- a: Execute all remaining steps.
- n: Move to the next step once the current one completed.
- s, Esc: Stop the run in flight.
- c: Clear the conversation.
- r: Reset the conversation and screenshots.
- e: Edit the instructions. CTRL+S saves, ESC cancels.
- 1-9: Download a screenshot.
- Up, Down, PgUp, PgDn: Scroll the history.
- q, CTRL+C: Quit.

PROMPT HOTKEYS:
- Enter: Run the instruction.
- CTRL+X: Stop the run in flight.
- CTRL+L: Clear the conversation.
- ALT+1-9: Download a screenshot.
- PgUp, PgDn: Scroll the history.
- CTRL+C: Quit.
"#;

    return text.trim().to_string();
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path = Config::default_config_path();
    let config_path_display = config_file_path.to_string_lossy().to_string();
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_path_display}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_path_display}");
    return Ok(());
}

async fn print_instructions() -> Result<()> {
    let store = FileInstructionStore::new(path::PathBuf::from(Config::get(
        ConfigKey::InstructionsFile,
    )));
    let instructions = store.load().await?;

    if instructions.is_empty() {
        println!(
            "There are no instructions in {}. Add some with the 'e' key in steps mode!",
            store.location()
        );
        return Ok(());
    }

    let lines = instructions
        .iter()
        .enumerate()
        .map(|(idx, instruction)| return format!("{}. {instruction}", idx + 1))
        .collect::<Vec<String>>();
    println!("{}", lines.join("\n"));

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_instructions() -> Command {
    return Command::new("instructions")
        .about("Inspect the instructions file used by steps mode.")
        .subcommand(Command::new("list").about("List the instructions in the order they run."))
        .subcommand(Command::new("path").about("Print the path of the instructions file."));
}

fn subcommand_once() -> Command {
    return Command::new("once")
        .about("Run a single instruction without the terminal UI and print the conversation.")
        .arg(
            Arg::new("instruction")
                .short('i')
                .long("instruction")
                .help("Instruction sent to the model, verbatim.")
                .num_args(1)
                .required(true),
        );
}

fn arg_provider() -> Arg {
    return Arg::new(ConfigKey::Provider.to_string())
        .short('p')
        .long(ConfigKey::Provider.to_string())
        .env("CLICKSTEP_PROVIDER")
        .num_args(1)
        .help(format!(
            "API provider serving the model. [default: {}]",
            Config::default(ConfigKey::Provider)
        ))
        .value_parser(PossibleValuesParser::new(ApiProvider::VARIANTS))
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("CLICKSTEP_MODEL")
        .num_args(1)
        .help(format!(
            "Model to sample from, as named by the provider. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .global(true);
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("CLICKSTEP_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.ends_with("HOTKEYS:") {
                return line.underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("clickstep")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("steps").about("Walk through the instructions file one step at a time. This is the default."))
        .subcommand(Command::new("prompt").about("Run a single free-text instruction, as often as you like."))
        .subcommand(subcommand_once())
        .subcommand(subcommand_instructions())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(arg_config_file())
        .arg(arg_provider())
        .arg(arg_model())
        .arg(
            Arg::new(ConfigKey::SystemPromptSuffix.to_string())
                .long(ConfigKey::SystemPromptSuffix.to_string())
                .env("CLICKSTEP_SYSTEM_PROMPT_SUFFIX")
                .num_args(1)
                .help(format!("Text appended to the system prompt. [default: {}]", Config::default(ConfigKey::SystemPromptSuffix)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::MaxTokens.to_string())
                .long(ConfigKey::MaxTokens.to_string())
                .env("CLICKSTEP_MAX_TOKENS")
                .num_args(1)
                .help(format!("Maximum number of tokens the model may produce per turn, between 1 and {MAX_TOKENS_LIMIT}. [default: {}]", Config::default(ConfigKey::MaxTokens)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ImageRetention.to_string())
                .long(ConfigKey::ImageRetention.to_string())
                .env("CLICKSTEP_IMAGE_RETENTION")
                .num_args(1)
                .help(format!("Number of most recent images kept in the conversation sent to the model. [default: {}]", Config::default(ConfigKey::ImageRetention)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::InstructionsFile.to_string())
                .short('f')
                .long(ConfigKey::InstructionsFile.to_string())
                .env("CLICKSTEP_INSTRUCTIONS_FILE")
                .num_args(1)
                .help(format!("Instructions file used by steps mode. Created with a default instruction when missing. [default: {}]", Config::default(ConfigKey::InstructionsFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Screenshot.to_string())
                .long(ConfigKey::Screenshot.to_string())
                .env("CLICKSTEP_SCREENSHOT")
                .num_args(1)
                .help("Screenshot attached to every instruction. Must be a png, jpg, or jpeg file.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::DownloadDir.to_string())
                .short('d')
                .long(ConfigKey::DownloadDir.to_string())
                .env("CLICKSTEP_DOWNLOAD_DIR")
                .num_args(1)
                .help(format!("Directory screenshots are downloaded to. [default: {}]", Config::default(ConfigKey::DownloadDir)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .long(ConfigKey::ApiUrl.to_string())
                .env("CLICKSTEP_API_URL")
                .num_args(1)
                .help("API URL of the provider. Defaults to the provider's public endpoint. Can be swapped to a compatible proxy.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ApiKey.to_string())
                .long(ConfigKey::ApiKey.to_string())
                .env("CLICKSTEP_API_KEY")
                .num_args(1)
                .help("API key of the provider. Falls back to ANTHROPIC_API_KEY or AWS_BEARER_TOKEN_BEDROCK.")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("CLICKSTEP_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds for the model to answer. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        );
}

/// Handles every subcommand that doesn't need the runner, returning what to
/// launch otherwise.
pub async fn handle(cmd: Command, matches: ArgMatches) -> Result<Option<Launch>> {
    match matches.subcommand() {
        Some(("steps", subcmd_matches)) => {
            Config::load(cmd, vec![&matches, subcmd_matches]).await?;
            return Ok(Some(Launch::Tui(Frontend::Steps)));
        }
        Some(("prompt", subcmd_matches)) => {
            Config::load(cmd, vec![&matches, subcmd_matches]).await?;
            return Ok(Some(Launch::Tui(Frontend::Prompt)));
        }
        Some(("once", subcmd_matches)) => {
            Config::load(cmd, vec![&matches, subcmd_matches]).await?;
            let instruction = subcmd_matches
                .get_one::<String>("instruction")
                .map(|e| return e.trim().to_string())
                .unwrap_or_default();
            if instruction.is_empty() {
                bail!("The instruction must not be empty");
            }

            return Ok(Some(Launch::Once(instruction)));
        }
        Some(("instructions", subcmd_matches)) => {
            Config::load(cmd, vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("list", _)) => {
                    print_instructions().await?;
                }
                Some(("path", _)) => {
                    println!("{}", Config::get(ConfigKey::InstructionsFile));
                }
                _ => {
                    subcommand_instructions().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = cmd;
                print_completions(completions, &mut app);
            }

            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(cmd));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(cmd).render(&mut io::stdout())?;
            return Ok(None);
        }
        _ => {
            Config::load(cmd, vec![&matches]).await?;
            return Ok(Some(Launch::Tui(Frontend::Steps)));
        }
    }
}

pub async fn parse() -> Result<Option<Launch>> {
    let matches = build().get_matches();
    return handle(build(), matches).await;
}
