#[cfg(test)]
#[path = "instruction_store_test.rs"]
mod tests;

use std::path;

use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_INSTRUCTION: &str = "What do you see in this screenshot?";
const INSTRUCTION_PREFIX: &str = "- ";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access instructions at {path}: {source}")]
    Io {
        path: path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn default_instructions() -> Vec<String> {
    return vec![DEFAULT_INSTRUCTION.to_string()];
}

/// Reads instructions in their persisted form. Lines are trimmed, blank lines
/// are dropped, and a leading `- ` is stripped.
pub fn parse_instructions(text: &str) -> Vec<String> {
    return text
        .lines()
        .map(|line| return line.trim())
        .filter(|line| return !line.is_empty())
        .map(|line| {
            return line
                .strip_prefix(INSTRUCTION_PREFIX)
                .unwrap_or(line)
                .to_string();
        })
        .collect();
}

/// Writes instructions in their persisted form, one per line prefixed with `- `.
pub fn format_instructions(instructions: &[String]) -> String {
    return instructions
        .iter()
        .map(|instruction| return format!("{INSTRUCTION_PREFIX}{instruction}\n"))
        .collect::<Vec<String>>()
        .join("");
}

#[async_trait]
pub trait InstructionStore {
    /// Returns the stored instructions. A store that holds nothing yet is
    /// seeded with the default instruction, which is then returned.
    async fn load(&self) -> Result<Vec<String>, StoreError>;

    /// Replaces the stored instructions.
    async fn save(&self, instructions: &[String]) -> Result<(), StoreError>;

    /// Incremented on every successful save.
    fn revision(&self) -> u64;

    /// Human readable location of the store, used in messages.
    fn location(&self) -> String;
}

pub type InstructionStoreBox = Box<dyn InstructionStore + Send + Sync>;
