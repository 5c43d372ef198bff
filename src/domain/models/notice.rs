#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Feedback shown inline next to the conversation, but never part of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: &str) -> Notice {
        return Notice {
            level: NoticeLevel::Info,
            text: text.to_string(),
        };
    }

    pub fn warning(text: &str) -> Notice {
        return Notice {
            level: NoticeLevel::Warning,
            text: text.to_string(),
        };
    }

    pub fn error(text: &str) -> Notice {
        return Notice {
            level: NoticeLevel::Error,
            text: text.to_string(),
        };
    }
}
