use super::{BlobStore, SavedBlob};
use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem blob store rooted at a single directory. Stored names are
/// uuid-prefixed so concurrent uploads of the same file never collide.
pub struct LocalBlobStorage {
    base_dir: PathBuf,
}

impl LocalBlobStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn stored_name(original_name: &str) -> String {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        format!("{}.{}", uuid::Uuid::new_v4(), extension)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStorage {
    async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
        mime_type: &str,
    ) -> Result<SavedBlob, PipelineError> {
        fs::create_dir_all(&self.base_dir).await?;

        let file_name = Self::stored_name(original_name);
        let path = self.base_dir.join(&file_name);
        fs::write(&path, bytes).await?;

        tracing::info!(
            "Blob saved: {} ({} bytes) -> {}",
            original_name,
            bytes.len(),
            path.display()
        );

        Ok(SavedBlob {
            file_name,
            original_name: original_name.to_string(),
            path,
            mime_type: mime_type.to_string(),
            size_bytes: bytes.len() as u64,
        })
    }

    async fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, PipelineError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &Path) -> Result<bool, PipelineError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                tracing::warn!("Failed to delete blob {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }
}
