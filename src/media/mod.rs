// src/media/mod.rs
// Media Tool - duration probe and sub-clip extraction

mod ffmpeg;

pub use ffmpeg::FfmpegTool;

use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::Path;

/// External media tooling the pipeline drives: a metadata-only duration
/// probe and an offset/length sub-clip extraction (stream copy, no
/// re-encode).
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Duration of the file in seconds.
    async fn probe_duration(&self, path: &Path) -> Result<f64, PipelineError>;

    /// Extract `[start, start + duration)` of `src` into `out`.
    async fn extract(
        &self,
        src: &Path,
        start_secs: f64,
        duration_secs: f64,
        out: &Path,
    ) -> Result<(), PipelineError>;
}
