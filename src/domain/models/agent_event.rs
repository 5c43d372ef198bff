use super::ContentBlock;
use super::ToolResult;

/// Everything a sampling loop reports while it runs, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    /// A content block produced by the model.
    Output(ContentBlock),
    /// The result of a requested tool, alongside the tool use ID it answers.
    ToolOutput(ToolResult, String),
    /// Raw body of a Messages API response.
    ApiResponse(String),
}
