use super::MediaTool;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// MediaTool backed by the ffmpeg/ffprobe binaries.
pub struct FfmpegTool {
    ffmpeg_bin: PathBuf,
    ffprobe_bin: PathBuf,
}

impl FfmpegTool {
    pub fn new(ffmpeg_bin: impl Into<PathBuf>, ffprobe_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

fn parse_duration(stdout: &str) -> Result<f64, PipelineError> {
    stdout
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| {
            PipelineError::ProbeFailure(format!("unparsable ffprobe output: {:?}", stdout.trim()))
        })
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn probe_duration(&self, path: &Path) -> Result<f64, PipelineError> {
        let output = Command::new(&self.ffprobe_bin)
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(path)
            .output()
            .await
            .map_err(|e| PipelineError::ProbeFailure(format!("ffprobe spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::ProbeFailure(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration(&stdout)?;

        tracing::debug!("Probed {}: {:.2}s", path.display(), duration);
        Ok(duration)
    }

    async fn extract(
        &self,
        src: &Path,
        start_secs: f64,
        duration_secs: f64,
        out: &Path,
    ) -> Result<(), PipelineError> {
        let output = Command::new(&self.ffmpeg_bin)
            .arg("-i")
            .arg(src)
            .arg("-ss")
            .arg(start_secs.to_string())
            .arg("-t")
            .arg(duration_secs.to_string())
            .arg("-c")
            .arg("copy")
            .arg(out)
            .output()
            .await
            .map_err(|e| PipelineError::ExtractionFailure(format!("ffmpeg spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::ExtractionFailure(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::debug!(
            "Extracted [{:.2}s, +{:.2}s) of {} -> {}",
            start_secs,
            duration_secs,
            src.display(),
            out.display()
        );
        Ok(())
    }
}
