use tui_textarea::Input;

use super::ContentBlock;
use super::RunOutcome;
use super::ToolResult;

#[derive(Debug)]
pub enum Event {
    AgentApiContent(u64, Vec<String>),
    AgentOutput(u64, ContentBlock),
    AgentToolOutput(u64, ToolResult, String),
    KeyboardCTRLC(),
    KeyboardInput(Input),
    KeyboardPaste(String),
    RunFinished(u64, RunOutcome),
    RunRejected(u64),
    UIResize(),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UITick(),
}
