#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::sync::mpsc;

use super::Renderer;
use super::Screenshots;
use super::Scroll;
use super::SessionState;
use crate::domain::models::format_instructions;
use crate::domain::models::parse_instructions;
use crate::domain::models::Action;
use crate::domain::models::ContentBlock;
use crate::domain::models::Frontend;
use crate::domain::models::InstructionStoreBox;
use crate::domain::models::MessageParam;
use crate::domain::models::Notice;
use crate::domain::models::RunOutcome;
use crate::domain::models::RunSettings;
use crate::domain::models::ToolResult;

/// Prepended to every instruction sent by the steps front-end.
pub const STEP_INSTRUCTION_PREFIX: &str = "Click a screenshot. ";

pub struct AppState {
    pub frontend: Frontend,
    pub session: SessionState,
    pub instructions: Vec<String>,
    pub prompt: String,
    pub settings: RunSettings,
    pub attachment: Option<String>,
    pub download_dir: path::PathBuf,
    pub scroll: Scroll,
    pub last_known_height: u16,
    pub last_known_width: u16,
    store: InstructionStoreBox,
}

impl AppState {
    pub async fn new(
        frontend: Frontend,
        settings: RunSettings,
        store: InstructionStoreBox,
        attachment: Option<String>,
        download_dir: path::PathBuf,
    ) -> Result<AppState> {
        let instructions = store.load().await?;

        return Ok(AppState {
            frontend,
            session: SessionState::new(instructions.len()),
            prompt: instructions
                .first()
                .map(|e| return e.to_string())
                .unwrap_or_default(),
            instructions,
            settings,
            attachment,
            download_dir,
            scroll: Scroll::default(),
            last_known_height: 0,
            last_known_width: 0,
            store,
        });
    }

    pub fn can_run(&self) -> bool {
        if self.session.is_running {
            return false;
        }

        if self.frontend == Frontend::Prompt {
            return !self.prompt.trim().is_empty();
        }

        return !self.session.stepper.is_exhausted();
    }

    fn dispatch(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let messages = vec![MessageParam::user_instruction(
            text,
            self.attachment.as_deref(),
        )];

        let run_id = self.session.begin_run();
        tx.send(Action::Run(run_id, self.settings.request(messages)))?;
        self.sync_dependants();

        return Ok(());
    }

    fn dispatch_step(&mut self, step: usize, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let text = format!("{STEP_INSTRUCTION_PREFIX}{}", self.instructions[step]);
        return self.dispatch(&text, tx);
    }

    /// Runs the current step. Returns false when nothing could be started.
    pub fn run_current_step(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if self.session.is_running {
            return Ok(false);
        }

        if let Some(step) = self.session.stepper.start() {
            self.dispatch_step(step, tx)?;
            return Ok(true);
        }

        return Ok(false);
    }

    /// Runs every remaining step, one after the other, until one of them
    /// doesn't complete.
    pub fn execute_all_steps(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if self.session.is_running {
            return Ok(false);
        }

        if let Some(step) = self.session.stepper.start_all() {
            self.dispatch_step(step, tx)?;
            return Ok(true);
        }

        return Ok(false);
    }

    /// Runs the free-text instruction of the prompt front-end.
    pub fn run_prompt(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if !self.can_run() {
            return Ok(false);
        }

        let prompt = self.prompt.trim().to_string();
        self.dispatch(&prompt, tx)?;
        return Ok(true);
    }

    pub fn next_step(&mut self) -> bool {
        return self.session.stepper.next();
    }

    /// Stops the run in flight. When executing all steps the chain ends here,
    /// even if the run manages to complete before the stop lands.
    pub fn stop(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.session.is_running {
            self.session.stepper.cancel_all();
            tx.send(Action::Stop())?;
        }

        return Ok(());
    }

    /// Clears the conversation. A run in flight is stopped first.
    pub fn clear_conversation(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.session.is_running {
            tx.send(Action::Stop())?;
        }

        if self.frontend == Frontend::Prompt {
            self.session.reset_all();
        } else {
            self.session.clear_conversation();
        }
        self.sync_dependants();

        return Ok(());
    }

    /// Clears the conversation and every screenshot. Not allowed while running.
    pub fn reset_all(&mut self) -> bool {
        if self.session.is_running {
            return false;
        }

        self.session.reset_all();
        self.sync_dependants();
        return true;
    }

    fn is_stale(&self, run_id: u64) -> bool {
        if self.session.is_current_run(run_id) {
            return false;
        }

        tracing::debug!(
            run_id,
            current = self.session.run_id,
            "Dropped event of a stale run"
        );
        return true;
    }

    pub fn handle_run_finished(
        &mut self,
        run_id: u64,
        outcome: RunOutcome,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        // Covers runs stopped by a clear, and a stop racing a finished run.
        if self.is_stale(run_id) {
            return Ok(());
        }

        let next_step = self.session.finish_run(&outcome);
        self.sync_dependants();

        if let Some(step) = next_step {
            self.dispatch_step(step, tx)?;
        }

        return Ok(());
    }

    pub fn handle_agent_output(&mut self, run_id: u64, block: &ContentBlock) {
        if self.is_stale(run_id) {
            return;
        }

        self.session.apply_output(block);
        self.sync_dependants();
    }

    pub fn handle_agent_tool_output(
        &mut self,
        run_id: u64,
        result: &ToolResult,
        tool_use_id: &str,
    ) {
        if self.is_stale(run_id) {
            return;
        }

        self.session.apply_tool_output(result, tool_use_id);
        self.sync_dependants();
    }

    pub fn handle_agent_api_content(&mut self, run_id: u64, texts: Vec<String>) {
        if self.is_stale(run_id) {
            return;
        }

        self.session.apply_api_content(texts);
        self.sync_dependants();
    }

    pub fn handle_run_rejected(&mut self, run_id: u64) {
        if self.is_stale(run_id) {
            return;
        }

        self.session.reject_run();
        self.sync_dependants();
    }

    /// The instructions as shown in the editor, one `- ` prefixed line each.
    pub fn instructions_text(&self) -> String {
        return format_instructions(&self.instructions);
    }

    /// Persists instructions typed in the editor and starts over from the
    /// first step.
    pub async fn save_instructions(&mut self, text: &str) -> Result<()> {
        let instructions = parse_instructions(text);
        self.store.save(&instructions).await?;
        tracing::debug!(
            count = instructions.len(),
            revision = self.store.revision(),
            "Saved instructions"
        );

        self.session.stepper.set_count(instructions.len());
        self.instructions = instructions;
        self.session.notices.push(Notice::info("Instructions saved!"));
        self.sync_dependants();

        return Ok(());
    }

    /// Saves screenshot number `idx` (zero based) to the download directory,
    /// reporting the outcome as a notice.
    pub async fn download_screenshot(&mut self, idx: usize) {
        let Some(screenshot) = self.session.screenshots.get(idx) else {
            self.session
                .notices
                .push(Notice::warning(&format!("There is no screenshot {}", idx + 1)));
            self.sync_dependants();
            return;
        };

        match Screenshots::save(screenshot, &self.download_dir).await {
            Ok(file_path) => {
                self.session.notices.push(Notice::info(&format!(
                    "Downloaded {}",
                    file_path.to_string_lossy()
                )));
            }
            Err(err) => {
                self.session.notices.push(Notice::error(&format!(
                    "Failed to download {}: {err}",
                    screenshot.filename
                )));
            }
        }
        self.sync_dependants();
    }

    pub fn history_lines(&self) -> Vec<String> {
        return Renderer::history_lines(&self.session, self.last_known_width as usize);
    }

    pub fn set_rect(&mut self, width: u16, height: u16) {
        self.last_known_width = width;
        self.last_known_height = height;
        self.sync_dependants();
    }

    /// Keeps the scroll state in line with the history after every change.
    /// The latest entry stays in view while a run is in flight, or when the
    /// history was already scrolled to the bottom.
    pub fn sync_dependants(&mut self) {
        let follow = self.session.is_running || self.scroll.is_at_bottom();
        let len = self.history_lines().len();
        self.scroll
            .set_state(len.try_into().unwrap_or(u16::MAX), self.last_known_height);

        if follow {
            self.scroll.last();
        }
    }
}
