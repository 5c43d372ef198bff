#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

pub const IMAGE_MEDIA_TYPE: &str = "image/png";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub media_type: String,
    pub data: String,
}

impl ImageSource {
    pub fn png(base64_image: &str) -> ImageSource {
        return ImageSource {
            source_type: "base64".to_string(),
            media_type: IMAGE_MEDIA_TYPE.to_string(),
            data: base64_image.to_string(),
        };
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Image {
        source: ImageSource,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: Vec<ContentBlock>,
        #[serde(default)]
        is_error: bool,
    },
    /// Any block type this application doesn't render.
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageParam {
    pub role: String,
    pub content: MessageContent,
}

impl MessageParam {
    /// Builds the user message sent at the start of a run. With a screenshot
    /// attached the image block comes first, followed by the instruction.
    pub fn user_instruction(text: &str, base64_image: Option<&str>) -> MessageParam {
        if let Some(image) = base64_image {
            return MessageParam {
                role: "user".to_string(),
                content: MessageContent::Blocks(vec![
                    ContentBlock::Image {
                        source: ImageSource::png(image),
                    },
                    ContentBlock::Text {
                        text: text.to_string(),
                    },
                ]),
            };
        }

        return MessageParam {
            role: "user".to_string(),
            content: MessageContent::Text(text.to_string()),
        };
    }

    pub fn assistant(blocks: Vec<ContentBlock>) -> MessageParam {
        return MessageParam {
            role: "assistant".to_string(),
            content: MessageContent::Blocks(blocks),
        };
    }

    pub fn user_blocks(blocks: Vec<ContentBlock>) -> MessageParam {
        return MessageParam {
            role: "user".to_string(),
            content: MessageContent::Blocks(blocks),
        };
    }
}

fn count_images(blocks: &[ContentBlock]) -> usize {
    return blocks
        .iter()
        .map(|block| {
            match block {
                ContentBlock::Image { .. } => return 1,
                ContentBlock::ToolResult { content, .. } => return count_images(content),
                _ => return 0,
            }
        })
        .sum();
}

fn drop_images(blocks: &mut Vec<ContentBlock>, to_remove: &mut usize) {
    blocks.retain_mut(|block| {
        if *to_remove == 0 {
            return true;
        }

        match block {
            ContentBlock::Image { .. } => {
                *to_remove -= 1;
                return false;
            }
            ContentBlock::ToolResult { content, .. } => {
                drop_images(content, to_remove);
                return true;
            }
            _ => return true,
        }
    });
}

/// Keeps only the `keep` most recent images across the whole conversation,
/// dropping the oldest ones first. Images nested in tool results count too.
pub fn retain_recent_images(messages: &mut [MessageParam], keep: usize) {
    let total = messages
        .iter()
        .map(|message| {
            if let MessageContent::Blocks(blocks) = &message.content {
                return count_images(blocks);
            }
            return 0;
        })
        .sum::<usize>();

    if total <= keep {
        return;
    }

    let mut to_remove = total - keep;
    for message in messages.iter_mut() {
        if let MessageContent::Blocks(blocks) = &mut message.content {
            drop_images(blocks, &mut to_remove);
        }
        if to_remove == 0 {
            break;
        }
    }
}
