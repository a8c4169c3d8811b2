// src/assets.rs
// Asset lifecycle: upload, lookup, deletion

use crate::error::PipelineError;
use crate::storage::BlobStore;
use crate::store::{MediaAsset, RecordStore};
use std::sync::Arc;

/// Upload/lookup/delete lifecycle over the blob store and record store.
pub struct AssetCatalog {
    store: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl AssetCatalog {
    pub fn new(store: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Persist the raw bytes and create the asset record, progress at zero.
    pub async fn upload(
        &self,
        bytes: &[u8],
        original_name: &str,
        mime_type: &str,
    ) -> Result<MediaAsset, PipelineError> {
        let blob = self.blobs.save(bytes, original_name, mime_type).await?;
        let asset = MediaAsset::new(
            blob.file_name,
            blob.original_name,
            blob.path,
            blob.mime_type,
            blob.size_bytes,
        );
        self.store.save(asset).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<MediaAsset>, PipelineError> {
        self.store.get(id).await
    }

    /// All assets, newest upload first.
    pub async fn list(&self) -> Result<Vec<MediaAsset>, PipelineError> {
        self.store.list().await
    }

    /// Delete the backing blob, then the record. Returns false for an
    /// unknown id.
    pub async fn delete(&self, id: &str) -> Result<bool, PipelineError> {
        let Some(asset) = self.store.get(id).await? else {
            return Ok(false);
        };

        if !self.blobs.delete(&asset.path).await? {
            tracing::warn!("Blob for asset {} was already gone", id);
        }
        self.store.delete(id).await
    }
}
