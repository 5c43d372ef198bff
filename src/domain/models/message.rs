#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;

/// One entry of the conversation history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: &str) -> Message {
        return Message {
            role,
            text: text.to_string().replace('\t', "  "),
        };
    }

    /// The entry as it's displayed, prefixed by its role.
    pub fn formatted(&self) -> String {
        return format!("{}{}", self.role.prefix(), self.text);
    }

    /// Splits the formatted entry in to lines no wider than `line_max_width`
    /// characters, breaking on spaces. Words longer than a full line are cut.
    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let line_max_width = line_max_width.max(1);
        let mut lines: Vec<String> = Vec::new();

        for full_line in self.formatted().split('\n') {
            if full_line.trim().is_empty() {
                lines.push(" ".to_string());
                continue;
            }

            let mut current_line = String::new();
            let mut char_count = 0;

            for word in full_line.split(' ') {
                let mut word = word.to_string();
                let mut word_len = word.chars().count();

                while word_len > line_max_width {
                    if char_count > 0 {
                        lines.push(current_line.trim_end().to_string());
                        current_line = String::new();
                        char_count = 0;
                    }

                    let head = word.chars().take(line_max_width).collect::<String>();
                    word = word.chars().skip(line_max_width).collect::<String>();
                    word_len = word.chars().count();
                    lines.push(head);
                }

                if char_count > 0 && word_len + char_count > line_max_width {
                    lines.push(current_line.trim_end().to_string());
                    current_line = String::new();
                    char_count = 0;
                }

                current_line += &word;
                current_line += " ";
                char_count += word_len + 1;
            }

            if char_count > 0 {
                lines.push(current_line.trim_end().to_string());
            }
        }

        return lines;
    }
}
