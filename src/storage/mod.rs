// src/storage/mod.rs
// Blob Store - raw media files

mod local;

pub use local::LocalBlobStorage;

use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Metadata for a blob that was written to storage.
#[derive(Debug, Clone)]
pub struct SavedBlob {
    pub file_name: String,
    pub original_name: String,
    pub path: PathBuf,
    pub mime_type: String,
    pub size_bytes: u64,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
        mime_type: &str,
    ) -> Result<SavedBlob, PipelineError>;

    /// Full contents, or `None` when the path does not exist.
    async fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, PipelineError>;

    /// Remove the blob. An already-absent blob returns false, never an error.
    async fn delete(&self, path: &Path) -> Result<bool, PipelineError>;
}
