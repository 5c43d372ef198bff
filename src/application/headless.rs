#[cfg(test)]
#[path = "headless_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::MessageParam;
use crate::domain::models::NoticeLevel;
use crate::domain::models::RunRequest;
use crate::domain::models::RunSettings;
use crate::domain::models::SamplingLoopBox;
use crate::domain::services::runner::RunnerService;
use crate::domain::services::Renderer;
use crate::domain::services::Screenshots;
use crate::domain::services::SessionState;
use crate::infrastructure::samplers::SamplerManager;

const TRANSCRIPT_WIDTH: usize = 100;

/// Drives a single run to completion, applying everything it reports to a
/// fresh session. CTRL+C stops the run.
pub async fn run_once(sampler: SamplingLoopBox, request: RunRequest) -> Result<SessionState> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let runner = tokio::spawn(async move {
        return RunnerService::start(sampler, event_tx, &mut action_rx).await;
    });

    let mut session = SessionState::new(0);
    let run_id = session.begin_run();
    action_tx.send(Action::Run(run_id, request))?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stopping = false;

    while session.is_running {
        tokio::select! {
            _ = &mut ctrl_c, if !stopping => {
                stopping = true;
                action_tx.send(Action::Stop())?;
            }
            event = event_rx.recv() => {
                match event {
                    Some(Event::AgentOutput(id, block)) if id == run_id => {
                        session.apply_output(&block);
                    }
                    Some(Event::AgentToolOutput(id, result, tool_use_id)) if id == run_id => {
                        session.apply_tool_output(&result, &tool_use_id);
                    }
                    Some(Event::AgentApiContent(id, texts)) if id == run_id => {
                        session.apply_api_content(texts);
                    }
                    Some(Event::RunFinished(id, outcome)) if id == run_id => {
                        session.finish_run(&outcome);
                    }
                    Some(Event::RunRejected(id)) if id == run_id => session.reject_run(),
                    Some(_) => {}
                    None => bail!("Runner stopped before the run finished"),
                }
            }
        }
    }

    drop(action_tx);
    runner.await??;

    return Ok(session);
}

pub fn transcript(session: &SessionState, width: usize) -> String {
    let mut lines = Renderer::history_lines(session, width);

    let screenshots = Renderer::screenshot_lines(session);
    if !screenshots.is_empty() {
        if !lines.is_empty() {
            lines.push("".to_string());
        }
        lines.extend(screenshots);
    }

    let notices = Renderer::notice_lines(session);
    if !notices.is_empty() {
        if !lines.is_empty() {
            lines.push("".to_string());
        }
        lines.extend(notices);
    }

    return lines.join("\n");
}

pub async fn start(instruction: String) -> Result<()> {
    let settings = RunSettings::from_config()?;
    let sampler = SamplerManager::get(settings.provider)?;

    let screenshot = Config::get(ConfigKey::Screenshot);
    let mut attachment: Option<String> = None;
    if !screenshot.is_empty() {
        attachment = Some(Screenshots::encode_upload(&path::PathBuf::from(screenshot)).await?);
    }

    let request = settings.request(vec![MessageParam::user_instruction(
        &instruction,
        attachment.as_deref(),
    )]);
    let session = run_once(sampler, request).await?;
    println!("{}", transcript(&session, TRANSCRIPT_WIDTH));

    let download_dir = path::PathBuf::from(Config::get(ConfigKey::DownloadDir));
    for screenshot in session.screenshots.iter() {
        let file_path = Screenshots::save(screenshot, &download_dir).await?;
        println!("Saved {}", file_path.to_string_lossy());
    }

    if session
        .notices
        .iter()
        .any(|notice| return notice.level == NoticeLevel::Error)
    {
        bail!("The run failed, see the error above");
    }

    return Ok(());
}
