#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::models::default_instructions;
use crate::domain::models::InstructionStore;
use crate::domain::models::StoreError;

/// Keeps instructions for the lifetime of the process only.
pub struct MemoryInstructionStore {
    instructions: Mutex<Vec<String>>,
    revision: AtomicU64,
}

impl Default for MemoryInstructionStore {
    fn default() -> MemoryInstructionStore {
        return MemoryInstructionStore::with_instructions(default_instructions());
    }
}

impl MemoryInstructionStore {
    pub fn with_instructions(instructions: Vec<String>) -> MemoryInstructionStore {
        return MemoryInstructionStore {
            instructions: Mutex::new(instructions),
            revision: AtomicU64::new(0),
        };
    }
}

#[async_trait]
impl InstructionStore for MemoryInstructionStore {
    #[allow(clippy::implicit_return)]
    async fn load(&self) -> Result<Vec<String>, StoreError> {
        let instructions = self
            .instructions
            .lock()
            .unwrap_or_else(|poisoned| return poisoned.into_inner());

        return Ok(instructions.clone());
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, instructions: &[String]) -> Result<(), StoreError> {
        let mut stored = self
            .instructions
            .lock()
            .unwrap_or_else(|poisoned| return poisoned.into_inner());
        *stored = instructions.to_vec();
        self.revision.fetch_add(1, Ordering::SeqCst);

        return Ok(());
    }

    fn revision(&self) -> u64 {
        return self.revision.load(Ordering::SeqCst);
    }

    fn location(&self) -> String {
        return "memory".to_string();
    }
}
