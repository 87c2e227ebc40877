//! File and clipboard transport used at the edges of import/export.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

/// Reads text files and writes export files.
#[async_trait]
pub trait TextFiles: Send + Sync {
    async fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Write `contents` as a new file called `name`; returns where it landed.
    async fn write_text(&self, name: &str, contents: &str) -> io::Result<PathBuf>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn read_text(&self) -> io::Result<String>;
    async fn write_text(&self, text: &str) -> io::Result<()>;
}

/// Local filesystem; exports are written under `out_dir`.
#[derive(Debug, Clone)]
pub struct LocalFiles {
    out_dir: PathBuf,
}

impl LocalFiles {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

#[async_trait]
impl TextFiles for LocalFiles {
    async fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path).await
    }

    async fn write_text(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        // Keep exports inside out_dir even if a caller passes a path.
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid file name: {name}")))?;
        fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join(file_name);
        fs::write(&path, contents).await?;
        Ok(path)
    }
}

/// Clipboard held in memory, for headless use and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<String>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: Mutex::new(text.into()) }
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn read_text(&self) -> io::Result<String> {
        Ok(self.text.lock().await.clone())
    }

    async fn write_text(&self, text: &str) -> io::Result<()> {
        *self.text.lock().await = text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_files_write_stays_in_out_dir() {
        let dir = tempdir().unwrap();
        let files = LocalFiles::new(dir.path().join("exports"));
        let path = files.write_text("../escape.json", "{}").await.unwrap();
        assert_eq!(path, dir.path().join("exports/escape.json"));
        assert_eq!(files.read_text(&path).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_memory_clipboard() {
        let clip = MemoryClipboard::with_text("a");
        assert_eq!(clip.read_text().await.unwrap(), "a");
        clip.write_text("b").await.unwrap();
        assert_eq!(clip.read_text().await.unwrap(), "b");
    }
}
