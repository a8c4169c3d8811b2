use super::progress;
use crate::chunk::{self, ChunkExtractor, ChunkPlan};
use crate::config::normalize_chunk_size;
use crate::error::PipelineError;
use crate::media::MediaTool;
use crate::providers::TranscriptionProvider;
use crate::store::{AssetUpdate, MediaAsset, RecordStore, Stage};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Recognized text for one chunk, keyed by the chunk's plan index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptFragment {
    pub index: usize,
    pub text: String,
}

/// Join fragment texts in ascending index order, one space between them.
/// Arrival order is irrelevant; the index is the only ordering that counts.
pub fn merge_fragments(mut fragments: Vec<TranscriptFragment>) -> String {
    fragments.sort_by_key(|f| f.index);
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs one transcription job end to end: probe, plan, extract, per-chunk
/// provider calls, index-ordered merge, atomic persist.
pub struct TranscriptionOrchestrator {
    store: Arc<dyn RecordStore>,
    media: Arc<dyn MediaTool>,
    provider: Arc<dyn TranscriptionProvider>,
    max_chunk_bytes: u64,
}

impl TranscriptionOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        media: Arc<dyn MediaTool>,
        provider: Arc<dyn TranscriptionProvider>,
        max_chunk_bytes: u64,
    ) -> Self {
        Self {
            store,
            media,
            provider,
            max_chunk_bytes: normalize_chunk_size(max_chunk_bytes),
        }
    }

    /// Run the job. On any failure the stage progress is reset to 0 and no
    /// partial transcript is persisted; accumulated fragments are discarded.
    pub async fn run(
        &self,
        asset_id: &str,
        cancel: CancellationToken,
    ) -> Result<(), PipelineError> {
        match self.run_inner(asset_id, &cancel).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Err(reset) = self
                    .store
                    .update_progress(asset_id, Stage::Transcription, 0)
                    .await
                {
                    tracing::error!(
                        "Could not reset transcription progress for {}: {}",
                        asset_id,
                        reset
                    );
                }
                Err(e)
            }
        }
    }

    async fn run_inner(
        &self,
        asset_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let asset = self
            .store
            .get(asset_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(asset_id.to_string()))?;

        let duration = self.media.probe_duration(&asset.path).await?;
        self.store
            .update(
                asset_id,
                AssetUpdate {
                    duration_secs: Some(duration),
                    transcription_progress: Some(progress::PROBED),
                    ..Default::default()
                },
            )
            .await?;

        let plan = chunk::plan(duration, asset.size_bytes, self.max_chunk_bytes)?;

        let text = if plan.is_passthrough() {
            tracing::info!(
                "Asset {} fits the provider limit ({} bytes), transcribing directly",
                asset_id,
                asset.size_bytes
            );
            self.transcribe_whole(&asset, cancel).await?
        } else {
            tracing::info!(
                "Asset {} ({} bytes) split into {} chunks",
                asset_id,
                asset.size_bytes,
                plan.chunks.len()
            );
            self.transcribe_chunks(&asset, &plan, cancel).await?
        };

        // Transcript and terminal progress land in a single update.
        self.store
            .update(asset_id, AssetUpdate::transcription_result(text))
            .await?
            .ok_or_else(|| PipelineError::NotFound(asset_id.to_string()))?;

        tracing::info!("Transcription for {} persisted", asset_id);
        Ok(())
    }

    async fn transcribe_whole(
        &self,
        asset: &MediaAsset,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        self.store
            .update_progress(&asset.id, Stage::Transcription, progress::SUBMITTED)
            .await?;

        let bytes = tokio::fs::read(&asset.path).await?;
        let text = self
            .provider
            .transcribe(bytes, &asset.file_name)
            .await?;

        self.store
            .update_progress(&asset.id, Stage::Transcription, progress::RESULT_RECEIVED)
            .await?;
        Ok(text)
    }

    async fn transcribe_chunks(
        &self,
        asset: &MediaAsset,
        plan: &ChunkPlan,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        self.store
            .update_progress(&asset.id, Stage::Transcription, progress::PLANNED)
            .await?;

        let extractor = ChunkExtractor::new(self.media.clone());
        let chunks = extractor.extract_all(&asset.path, plan, cancel).await?;

        let total = chunks.len();
        let mut fragments: Vec<TranscriptFragment> = Vec::with_capacity(total);

        for chunk in chunks.iter() {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            tracing::info!(
                "Transcribing chunk {}/{} of asset {}",
                chunk.spec.index + 1,
                total,
                asset.id
            );

            let bytes = tokio::fs::read(&chunk.path).await?;
            let file_name = chunk
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("chunk_{}", chunk.spec.index));

            let text = self.provider.transcribe(bytes, &file_name).await?;
            fragments.push(TranscriptFragment {
                index: chunk.spec.index,
                text,
            });

            self.store
                .update_progress(
                    &asset.id,
                    Stage::Transcription,
                    progress::chunk_progress(fragments.len(), total),
                )
                .await?;
        }

        // `chunks` drops here and with it every chunk file.
        Ok(merge_fragments(fragments))
    }
}
