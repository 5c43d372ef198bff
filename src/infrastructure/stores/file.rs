#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::io::ErrorKind;
use std::path;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::models::default_instructions;
use crate::domain::models::format_instructions;
use crate::domain::models::parse_instructions;
use crate::domain::models::InstructionStore;
use crate::domain::models::StoreError;

/// Instructions persisted to a plain text file, one `- ` prefixed line each.
pub struct FileInstructionStore {
    file_path: path::PathBuf,
    revision: AtomicU64,
}

impl FileInstructionStore {
    pub fn new(file_path: path::PathBuf) -> FileInstructionStore {
        return FileInstructionStore {
            file_path,
            revision: AtomicU64::new(0),
        };
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        return StoreError::Io {
            path: self.file_path.clone(),
            source,
        };
    }

    async fn write(&self, instructions: &[String]) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| return self.io_error(err))?;
            }
        }

        fs::write(&self.file_path, format_instructions(instructions))
            .await
            .map_err(|err| return self.io_error(err))?;

        return Ok(());
    }
}

#[async_trait]
impl InstructionStore for FileInstructionStore {
    #[allow(clippy::implicit_return)]
    async fn load(&self) -> Result<Vec<String>, StoreError> {
        match fs::read_to_string(&self.file_path).await {
            Ok(text) => return Ok(parse_instructions(&text)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    path = ?self.file_path,
                    "Instructions file is missing, creating it with the default"
                );
                let instructions = default_instructions();
                self.write(&instructions).await?;
                return Ok(instructions);
            }
            Err(err) => return Err(self.io_error(err)),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, instructions: &[String]) -> Result<(), StoreError> {
        self.write(instructions).await?;
        self.revision.fetch_add(1, Ordering::SeqCst);
        return Ok(());
    }

    fn revision(&self) -> u64 {
        return self.revision.load(Ordering::SeqCst);
    }

    fn location(&self) -> String {
        return self.file_path.to_string_lossy().to_string();
    }
}
