use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Assistant,
    System,
    Tool,
    Error,
}

impl Role {
    /// Prefix placed in front of every history entry with this role.
    pub fn prefix(&self) -> &'static str {
        match self {
            Role::Assistant => return "🤖 Assistant: ",
            Role::System => return "💻 System: ",
            Role::Tool => return "🔧 ",
            Role::Error => return "❌ ",
        }
    }
}
