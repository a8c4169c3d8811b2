// src/store/mod.rs
// Record Store - asset metadata, results and progress

mod memory;

pub use memory::InMemoryRecordStore;

use crate::error::PipelineError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A persisted result blob (transcription or summary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlob {
    pub text: String,
}

impl TextBlob {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Processing stage a progress value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Transcription,
    Summary,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Transcription => "transcription",
            Stage::Summary => "summary",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: String,
    pub file_name: String,
    pub original_name: String,
    pub path: PathBuf,
    pub mime_type: String,
    pub size_bytes: u64,
    pub duration_secs: Option<f64>,
    pub uploaded_at: DateTime<Utc>,
    pub transcription: Option<TextBlob>,
    pub transcription_progress: u8,
    pub summary: Option<TextBlob>,
    pub summary_progress: u8,
}

impl MediaAsset {
    /// Fresh asset as created at upload time: no results, progress at zero.
    pub fn new(
        file_name: impl Into<String>,
        original_name: impl Into<String>,
        path: PathBuf,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            original_name: original_name.into(),
            path,
            mime_type: mime_type.into(),
            size_bytes,
            duration_secs: None,
            uploaded_at: Utc::now(),
            transcription: None,
            transcription_progress: 0,
            summary: None,
            summary_progress: 0,
        }
    }

    pub fn progress(&self, stage: Stage) -> u8 {
        match stage {
            Stage::Transcription => self.transcription_progress,
            Stage::Summary => self.summary_progress,
        }
    }
}

/// Partial update applied to an asset. Result fields are tri-state: `None`
/// leaves the field untouched, `Some(None)` persists an explicit null.
#[derive(Debug, Clone, Default)]
pub struct AssetUpdate {
    pub duration_secs: Option<f64>,
    pub transcription: Option<Option<TextBlob>>,
    pub transcription_progress: Option<u8>,
    pub summary: Option<Option<TextBlob>>,
    pub summary_progress: Option<u8>,
}

impl AssetUpdate {
    pub fn transcription_result(text: impl Into<String>) -> Self {
        Self {
            transcription: Some(Some(TextBlob::new(text))),
            transcription_progress: Some(100),
            ..Default::default()
        }
    }

    pub fn summary_result(text: impl Into<String>) -> Self {
        Self {
            summary: Some(Some(TextBlob::new(text))),
            summary_progress: Some(100),
            ..Default::default()
        }
    }

    pub fn clear_summary() -> Self {
        Self {
            summary: Some(None),
            summary_progress: Some(0),
            ..Default::default()
        }
    }
}

/// Storage seam for asset records. Orchestrators mutate progress and results
/// only through this interface; last-write-wins per field.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, asset: MediaAsset) -> Result<MediaAsset, PipelineError>;

    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, PipelineError>;

    /// All assets, newest upload first.
    async fn list(&self) -> Result<Vec<MediaAsset>, PipelineError>;

    async fn update(
        &self,
        id: &str,
        fields: AssetUpdate,
    ) -> Result<Option<MediaAsset>, PipelineError>;

    async fn update_progress(
        &self,
        id: &str,
        stage: Stage,
        value: u8,
    ) -> Result<(), PipelineError>;

    /// Remove the record. Returns false when the id was absent.
    async fn delete(&self, id: &str) -> Result<bool, PipelineError>;
}
