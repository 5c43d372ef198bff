use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub output: Option<String>,
    pub error: Option<String>,
    pub base64_image: Option<String>,
}

impl ToolResult {
    pub fn with_error(error: &str) -> ToolResult {
        return ToolResult {
            error: Some(error.to_string()),
            ..ToolResult::default()
        };
    }
}
