#[cfg(test)]
#[path = "screenshots_test.rs"]
mod tests;

use std::io::Cursor;
use std::io::ErrorKind;
use std::path;

use anyhow::bail;
use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageOutputFormat;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::Screenshot;

const UPLOAD_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub struct Screenshots {}

impl Screenshots {
    /// Candidate `n` for a screenshot saved inside `dir`: the filename itself
    /// first, then `stem_N.ext`.
    pub fn download_path(dir: &path::Path, filename: &str, n: usize) -> path::PathBuf {
        if n == 0 {
            return dir.join(filename);
        }

        let as_path = path::Path::new(filename);
        let stem = as_path
            .file_stem()
            .map(|e| return e.to_string_lossy().to_string())
            .unwrap_or_else(|| return filename.to_string());
        let extension = as_path
            .extension()
            .map(|e| return e.to_string_lossy().to_string())
            .unwrap_or_else(|| return "png".to_string());

        return dir.join(format!("{stem}_{n}.{extension}"));
    }

    /// Decodes a screenshot and writes it to `dir`, returning the path written.
    /// Screenshots sharing a filename never overwrite each other: the first
    /// free candidate is claimed with an exclusive create.
    pub async fn save(screenshot: &Screenshot, dir: &path::Path) -> Result<path::PathBuf> {
        let bytes = screenshot.decode()?;
        fs::create_dir_all(dir).await?;

        let mut n = 0;
        loop {
            let file_path = Screenshots::download_path(dir, &screenshot.filename, n);
            let file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&file_path)
                .await;

            match file {
                Ok(mut file) => {
                    file.write_all(&bytes).await?;
                    file.flush().await?;
                    tracing::debug!(path = ?file_path, "Saved screenshot");
                    return Ok(file_path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    n += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Reads a PNG or JPEG from disk and returns it as a base64 PNG, ready to be
    /// attached to an instruction.
    pub async fn encode_upload(file_path: &path::Path) -> Result<String> {
        let extension = file_path
            .extension()
            .map(|e| return e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
            bail!(
                "Screenshot {} must be one of: {}",
                file_path.display(),
                UPLOAD_EXTENSIONS.join(", ")
            );
        }

        let bytes = fs::read(file_path).await?;
        let decoded = image::load_from_memory(&bytes)?;

        let mut png = Cursor::new(vec![]);
        decoded.write_to(&mut png, ImageOutputFormat::Png)?;

        return Ok(STANDARD.encode(png.into_inner()));
    }
}
