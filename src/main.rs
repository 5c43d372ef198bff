#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Event;
use domain::models::Frontend;
use domain::models::RunSettings;
use infrastructure::samplers::SamplerManager;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio::task;

use crate::application::cli;
use crate::application::cli::Launch;
use crate::application::headless;
use crate::application::ui;
use crate::domain::services::runner::RunnerService;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! Clickstep has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        )
        .red()
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn start_tui(frontend: Frontend) -> Result<()> {
    let settings = RunSettings::from_config()?;
    let sampler = SamplerManager::get(settings.provider)?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return RunnerService::start(sampler, event_tx, &mut action_rx).await;
    });

    let ui_future = ui::start(frontend, action_tx, event_rx);

    let res = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(joined) => joined?,
            None => Ok(()),
        },
        res = ui_future => res,
    );

    return res;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let debug_log_dir = env::var("CLICKSTEP_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("clickstep")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("clickstep")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let launch = match cli::parse().await {
        Ok(Some(launch)) => launch,
        Ok(None) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let res = match launch {
        Launch::Tui(frontend) => {
            let res = start_tui(frontend).await;
            if res.is_err() {
                ui::destruct_terminal_for_panic();
            }
            res
        }
        Launch::Once(instruction) => headless::start(instruction).await,
    };

    if let Err(err) = res {
        handle_error(err);
    }

    process::exit(0);
}
