use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A screenshot returned by a tool, kept as the base64 PNG it arrived as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screenshot {
    pub filename: String,
    pub base64_image: String,
}

impl Screenshot {
    /// The filename only depends on the tool use ID, so two screenshots from
    /// the same tool use share a name.
    pub fn from_tool(tool_use_id: &str, base64_image: &str) -> Screenshot {
        return Screenshot {
            filename: format!("screenshot_{tool_use_id}.png"),
            base64_image: base64_image.to_string(),
        };
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        return Ok(STANDARD.decode(self.base64_image.trim())?);
    }
}
