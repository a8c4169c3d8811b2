use super::{ChunkPlan, ChunkSpec};
use crate::error::PipelineError;
use crate::media::MediaTool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// A chunk materialized on disk.
#[derive(Debug)]
pub struct ExtractedChunk {
    pub spec: ChunkSpec,
    pub path: PathBuf,
}

/// The extracted chunk files plus the temp directory that owns them.
/// Dropping this guard removes every chunk file, on success, failure or
/// cancellation alike.
#[derive(Debug)]
pub struct ExtractedChunks {
    chunks: Vec<ExtractedChunk>,
    _dir: TempDir,
}

impl ExtractedChunks {
    pub fn iter(&self) -> impl Iterator<Item = &ExtractedChunk> {
        self.chunks.iter()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Drives the Media Tool to materialize a chunk plan, sequentially in index
/// order, inside a job-scoped temporary directory.
pub struct ChunkExtractor {
    media: Arc<dyn MediaTool>,
}

impl ChunkExtractor {
    pub fn new(media: Arc<dyn MediaTool>) -> Self {
        Self { media }
    }

    pub async fn extract_all(
        &self,
        src: &Path,
        plan: &ChunkPlan,
        cancel: &CancellationToken,
    ) -> Result<ExtractedChunks, PipelineError> {
        let dir = tempfile::Builder::new()
            .prefix("audio-chunks-")
            .tempdir()
            .map_err(|e| PipelineError::ExtractionFailure(format!("temp dir: {}", e)))?;

        let extension = src
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp3")
            .to_string();

        let mut chunks = Vec::with_capacity(plan.chunks.len());
        for spec in &plan.chunks {
            if cancel.is_cancelled() {
                tracing::warn!("Extraction cancelled at chunk {}", spec.index);
                return Err(PipelineError::Cancelled);
            }

            let out = dir
                .path()
                .join(format!("chunk_{:03}.{}", spec.index, extension));

            tracing::info!(
                "Extracting chunk {}/{}: [{:.2}s, +{:.2}s)",
                spec.index + 1,
                plan.chunks.len(),
                spec.start_secs,
                spec.duration_secs
            );

            self.media
                .extract(src, spec.start_secs, spec.duration_secs, &out)
                .await?;

            chunks.push(ExtractedChunk {
                spec: spec.clone(),
                path: out,
            });
        }

        Ok(ExtractedChunks { chunks, _dir: dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::plan;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// MediaTool double that writes the chunk's start offset into the output
    /// file, and can be told to fail at a given call number.
    struct FakeMediaTool {
        fail_at_call: Option<usize>,
        created: Mutex<Vec<PathBuf>>,
    }

    impl FakeMediaTool {
        fn new(fail_at_call: Option<usize>) -> Self {
            Self {
                fail_at_call,
                created: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaTool for FakeMediaTool {
        async fn probe_duration(&self, _path: &Path) -> Result<f64, PipelineError> {
            Ok(300.0)
        }

        async fn extract(
            &self,
            _src: &Path,
            start_secs: f64,
            _duration_secs: f64,
            out: &Path,
        ) -> Result<(), PipelineError> {
            let mut created = self.created.lock().unwrap();
            if self.fail_at_call == Some(created.len()) {
                return Err(PipelineError::ExtractionFailure("boom".into()));
            }
            std::fs::write(out, start_secs.to_string()).unwrap();
            created.push(out.to_path_buf());
            Ok(())
        }
    }

    const MB: u64 = 1024 * 1024;

    #[tokio::test]
    async fn extracts_every_chunk_in_index_order() {
        let media = Arc::new(FakeMediaTool::new(None));
        let extractor = ChunkExtractor::new(media.clone());
        let plan = plan(300.0, 50 * MB, 20 * MB).unwrap();

        let chunks = extractor
            .extract_all(Path::new("in.mp3"), &plan, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.spec.index, i);
            let content = std::fs::read_to_string(&chunk.path).unwrap();
            assert_eq!(content, (i as f64 * 100.0).to_string());
        }
    }

    #[tokio::test]
    async fn chunk_files_are_deleted_when_the_guard_drops() {
        let media = Arc::new(FakeMediaTool::new(None));
        let extractor = ChunkExtractor::new(media.clone());
        let plan = plan(300.0, 50 * MB, 20 * MB).unwrap();

        let chunks = extractor
            .extract_all(Path::new("in.mp3"), &plan, &CancellationToken::new())
            .await
            .unwrap();
        let paths: Vec<PathBuf> = chunks.iter().map(|c| c.path.clone()).collect();
        assert!(paths.iter().all(|p| p.exists()));

        drop(chunks);
        assert!(paths.iter().all(|p| !p.exists()), "chunk files must be gone");
    }

    #[tokio::test]
    async fn failure_mid_extraction_cleans_up_earlier_chunks() {
        let media = Arc::new(FakeMediaTool::new(Some(1)));
        let extractor = ChunkExtractor::new(media.clone());
        let plan = plan(300.0, 50 * MB, 20 * MB).unwrap();

        let err = extractor
            .extract_all(Path::new("in.mp3"), &plan, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ExtractionFailure(_)));

        let created = media.created.lock().unwrap();
        assert_eq!(created.len(), 1, "only chunk 0 was written");
        assert!(!created[0].exists(), "partial chunk must be removed");
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_the_next_chunk() {
        let media = Arc::new(FakeMediaTool::new(None));
        let extractor = ChunkExtractor::new(media);
        let plan = plan(300.0, 50 * MB, 20 * MB).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = extractor
            .extract_all(Path::new("in.mp3"), &plan, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
    }
}
