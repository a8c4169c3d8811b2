// src/error.rs
// Pipeline error taxonomy

use thiserror::Error;

/// Errors surfaced by the transcription/summarization pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("probe failed: {0}")]
    ProbeFailure(String),

    #[error("chunk extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("transcription provider error: {0}")]
    TranscriptionProvider(String),

    #[error("summarization provider error: {0}")]
    SummaryProvider(String),

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("record store error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("a {stage} job is already running for asset {asset_id}")]
    AlreadyRunning { asset_id: String, stage: &'static str },

    #[error("job cancelled")]
    Cancelled,
}

impl PipelineError {
    /// True when the failure came from a remote provider rather than local state.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            PipelineError::TranscriptionProvider(_) | PipelineError::SummaryProvider(_)
        )
    }
}
