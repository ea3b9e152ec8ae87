//! Output sink for the serialized product set

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for the final JSON document
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WriteError>;
}

/// Writes to the local file system, creating missing parent directories
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOutputSink;

#[async_trait]
impl OutputSink for FileOutputSink {
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WriteError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
        }

        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| WriteError::Write {
                path: path.display().to_string(),
                source,
            })?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/output.json");

        FileOutputSink.write(&path, b"[]").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(&path, "old contents").unwrap();

        FileOutputSink.write(&path, b"[]").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn reports_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let err = FileOutputSink
            .write(&blocker.join("output.json"), b"[]")
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::CreateDir { .. }));
    }
}
