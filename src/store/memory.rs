use super::{AssetUpdate, MediaAsset, RecordStore, Stage};
use crate::error::PipelineError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// HashMap-backed record store. Suits tests and single-process deployments;
/// a database-backed implementation plugs in behind the same trait.
#[derive(Default)]
pub struct InMemoryRecordStore {
    assets: Mutex<HashMap<String, MediaAsset>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_update(asset: &mut MediaAsset, fields: AssetUpdate) {
    if let Some(duration) = fields.duration_secs {
        asset.duration_secs = Some(duration);
    }
    if let Some(transcription) = fields.transcription {
        asset.transcription = transcription;
    }
    if let Some(progress) = fields.transcription_progress {
        asset.transcription_progress = progress.min(100);
    }
    if let Some(summary) = fields.summary {
        asset.summary = summary;
    }
    if let Some(progress) = fields.summary_progress {
        asset.summary_progress = progress.min(100);
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn save(&self, asset: MediaAsset) -> Result<MediaAsset, PipelineError> {
        let mut assets = self
            .assets
            .lock()
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        assets.insert(asset.id.clone(), asset.clone());
        Ok(asset)
    }

    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, PipelineError> {
        let assets = self
            .assets
            .lock()
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        Ok(assets.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<MediaAsset>, PipelineError> {
        let assets = self
            .assets
            .lock()
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        let mut all: Vec<MediaAsset> = assets.values().cloned().collect();
        all.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(all)
    }

    async fn update(
        &self,
        id: &str,
        fields: AssetUpdate,
    ) -> Result<Option<MediaAsset>, PipelineError> {
        let mut assets = self
            .assets
            .lock()
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        match assets.get_mut(id) {
            Some(asset) => {
                apply_update(asset, fields);
                Ok(Some(asset.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_progress(
        &self,
        id: &str,
        stage: Stage,
        value: u8,
    ) -> Result<(), PipelineError> {
        let mut assets = self
            .assets
            .lock()
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        if let Some(asset) = assets.get_mut(id) {
            match stage {
                Stage::Transcription => asset.transcription_progress = value.min(100),
                Stage::Summary => asset.summary_progress = value.min(100),
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, PipelineError> {
        let mut assets = self
            .assets
            .lock()
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        Ok(assets.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TextBlob;
    use std::path::PathBuf;

    fn sample_asset() -> MediaAsset {
        MediaAsset::new(
            "rec.mp3",
            "meeting recording.mp3",
            PathBuf::from("uploads/rec.mp3"),
            "audio/mpeg",
            1024,
        )
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = InMemoryRecordStore::new();
        let asset = store.save(sample_asset()).await.unwrap();

        let fetched = store.get(&asset.id).await.unwrap().unwrap();
        assert_eq!(fetched.file_name, "rec.mp3");
        assert_eq!(fetched.transcription_progress, 0);
        assert!(fetched.transcription.is_none());
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_alone() {
        let store = InMemoryRecordStore::new();
        let asset = store.save(sample_asset()).await.unwrap();

        store
            .update(&asset.id, AssetUpdate::transcription_result("hello"))
            .await
            .unwrap();

        let fetched = store.get(&asset.id).await.unwrap().unwrap();
        assert_eq!(fetched.transcription, Some(TextBlob::new("hello")));
        assert_eq!(fetched.transcription_progress, 100);
        assert!(fetched.summary.is_none(), "summary must be untouched");
        assert_eq!(fetched.summary_progress, 0);
    }

    #[tokio::test]
    async fn clear_summary_persists_explicit_null() {
        let store = InMemoryRecordStore::new();
        let asset = store.save(sample_asset()).await.unwrap();
        store
            .update(&asset.id, AssetUpdate::summary_result("old"))
            .await
            .unwrap();

        store
            .update(&asset.id, AssetUpdate::clear_summary())
            .await
            .unwrap();

        let fetched = store.get(&asset.id).await.unwrap().unwrap();
        assert!(fetched.summary.is_none());
        assert_eq!(fetched.summary_progress, 0);
    }

    #[tokio::test]
    async fn update_missing_asset_returns_none() {
        let store = InMemoryRecordStore::new();
        let result = store
            .update("no-such-id", AssetUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryRecordStore::new();
        let asset = store.save(sample_asset()).await.unwrap();

        assert!(store.delete(&asset.id).await.unwrap());
        assert!(!store.delete(&asset.id).await.unwrap());
    }

    #[tokio::test]
    async fn progress_is_clamped_to_100() {
        let store = InMemoryRecordStore::new();
        let asset = store.save(sample_asset()).await.unwrap();

        store
            .update_progress(&asset.id, Stage::Summary, 250)
            .await
            .unwrap();
        let fetched = store.get(&asset.id).await.unwrap().unwrap();
        assert_eq!(fetched.summary_progress, 100);
    }
}
