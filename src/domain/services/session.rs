#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use super::Stepper;
use crate::domain::models::ContentBlock;
use crate::domain::models::Message;
use crate::domain::models::Notice;
use crate::domain::models::Role;
use crate::domain::models::RunOutcome;
use crate::domain::models::Screenshot;
use crate::domain::models::ToolResult;

/// Per-session state. Everything the sampling loop reports is appended in the
/// order it arrives.
pub struct SessionState {
    pub messages: Vec<Message>,
    pub screenshots: Vec<Screenshot>,
    pub notices: Vec<Notice>,
    pub stepper: Stepper,
    pub is_running: bool,
    /// Id of the latest run started. Events of any other run are stale.
    pub run_id: u64,
}

impl SessionState {
    pub fn new(instruction_count: usize) -> SessionState {
        return SessionState {
            messages: vec![],
            screenshots: vec![],
            notices: vec![],
            stepper: Stepper::new(instruction_count),
            is_running: false,
            run_id: 0,
        };
    }

    pub fn current_step(&self) -> usize {
        return self.stepper.current();
    }

    pub fn step_completed(&self) -> bool {
        return self.stepper.is_completed();
    }

    pub fn apply_output(&mut self, block: &ContentBlock) {
        if let ContentBlock::Text { text } = block {
            self.messages.push(Message::new(Role::Assistant, text));
        }
    }

    pub fn apply_tool_output(&mut self, result: &ToolResult, tool_use_id: &str) {
        if let Some(output) = result.output.as_ref().filter(|e| return !e.is_empty()) {
            self.messages
                .push(Message::new(Role::Tool, &format!("Tool Output: {output}")));
        }

        if let Some(error) = result.error.as_ref().filter(|e| return !e.is_empty()) {
            self.messages
                .push(Message::new(Role::Error, &format!("Error: {error}")));
        }

        if let Some(image) = result.base64_image.as_ref().filter(|e| return !e.is_empty()) {
            self.screenshots
                .push(Screenshot::from_tool(tool_use_id, image));
        }
    }

    pub fn apply_api_content(&mut self, texts: Vec<String>) {
        for text in texts {
            self.messages.push(Message::new(Role::System, &text));
        }
    }

    /// Marks a new run as in flight and returns its id.
    pub fn begin_run(&mut self) -> u64 {
        self.run_id += 1;
        self.is_running = true;
        return self.run_id;
    }

    /// Whether events tagged with `run_id` belong to the run in flight.
    pub fn is_current_run(&self, run_id: u64) -> bool {
        return self.is_running && self.run_id == run_id;
    }

    /// The runner refused to start the run. Nothing else will be reported for
    /// it.
    pub fn reject_run(&mut self) {
        self.is_running = false;
        self.stepper.abandon();
        self.notices
            .push(Notice::warning("A run is already in progress"));
    }

    /// Clears the running flag whatever the outcome, surfacing cancellations
    /// and failures as notices. Returns the next step to run when executing
    /// all steps.
    pub fn finish_run(&mut self, outcome: &RunOutcome) -> Option<usize> {
        self.is_running = false;

        match outcome {
            RunOutcome::Completed(_) => {}
            RunOutcome::Cancelled => {
                self.notices
                    .push(Notice::warning("Execution was stopped by user"));
            }
            RunOutcome::Failed(err) => {
                self.notices
                    .push(Notice::error(&format!("Error occurred: {err}")));
            }
        }

        return self.stepper.finish(outcome);
    }

    /// Drops the conversation and starts over from the first step. Screenshots
    /// are kept.
    pub fn clear_conversation(&mut self) {
        self.messages.clear();
        self.notices.clear();
        self.stepper.reset();
        self.is_running = false;
    }

    pub fn reset_all(&mut self) {
        self.clear_conversation();
        self.screenshots.clear();
    }
}
