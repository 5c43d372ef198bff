#[cfg(test)]
#[path = "api_response_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::Result;
use serde_json::Value;

fn text_of(item: &Value) -> Option<String> {
    if item.get("type").and_then(|t| return t.as_str()) != Some("text") {
        return None;
    }

    return item
        .get("text")
        .and_then(|text| return text.as_str())
        .map(|text| return text.to_string());
}

pub struct ApiResponse {}

impl ApiResponse {
    /// Flattens the `content` of a raw Messages API response body to the text
    /// it carries. `content` may be a list of blocks or a single block; blocks
    /// that aren't text are skipped.
    pub fn content_texts(body: &str) -> Result<Vec<String>> {
        let json: Value = serde_json::from_str(body)?;
        let content = json
            .get("content")
            .ok_or_else(|| return anyhow!("API response has no content field"))?;

        if let Some(items) = content.as_array() {
            return Ok(items.iter().filter_map(text_of).collect());
        }

        if content.is_object() {
            return Ok(text_of(content).into_iter().collect());
        }

        return Ok(vec![]);
    }
}
