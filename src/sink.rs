//! Destinations for finished documents.

use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Receives one finished document per export.
#[allow(async_fn_in_trait)]
pub trait SaveSink {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> io::Result<()>;
}

/// Writes documents into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveSink for DirectorySink {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> io::Result<()> {
        // Only bare names; the directory is fixed by the sink.
        if Path::new(file_name).file_name().and_then(|n| n.to_str()) != Some(file_name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a plain file name", file_name),
            ));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;
        log::debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Keeps saved documents in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved documents in save order.
    pub async fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().await.clone()
    }

    pub async fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .await
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, bytes)| bytes.clone())
    }
}

impl SaveSink for MemorySink {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> io::Result<()> {
        self.files.lock().await.push((file_name.to_string(), bytes));
        Ok(())
    }
}
