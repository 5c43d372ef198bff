#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

use super::SessionState;
use crate::domain::models::NoticeLevel;

/// Projects a session to display lines. Never mutates the session.
pub struct Renderer {}

impl Renderer {
    /// Conversation history, wrapped to `width` characters.
    pub fn history_lines(session: &SessionState, width: usize) -> Vec<String> {
        return session
            .messages
            .iter()
            .flat_map(|message| return message.as_string_lines(width))
            .collect();
    }

    /// One caption per screenshot, numbered from 1 for the download keys.
    pub fn screenshot_lines(session: &SessionState) -> Vec<String> {
        return session
            .screenshots
            .iter()
            .enumerate()
            .map(|(idx, screenshot)| {
                let n = idx + 1;
                return format!("[{n}] {}", screenshot.filename);
            })
            .collect();
    }

    pub fn notice_lines(session: &SessionState) -> Vec<String> {
        return session
            .notices
            .iter()
            .map(|notice| {
                match notice.level {
                    NoticeLevel::Info => return format!("✅ {}", notice.text),
                    NoticeLevel::Warning => return format!("⚠️ {}", notice.text),
                    NoticeLevel::Error => return format!("❌ {}", notice.text),
                }
            })
            .collect();
    }

    /// The "Step N of M" banner for the steps front-end.
    pub fn step_banner(session: &SessionState, instructions: &[String]) -> String {
        if instructions.is_empty() {
            return "No instructions available. Press 'e' to add some.".to_string();
        }

        let count = instructions.len();
        let current = session.current_step();
        if current >= count {
            return format!("All {count} steps have been executed.");
        }

        let mut banner = format!("Step {} of {count}: {}", current + 1, instructions[current]);
        if session.step_completed() {
            banner += " (completed)";
        }

        return banner;
    }
}
