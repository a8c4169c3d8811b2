use super::progress;
use crate::error::PipelineError;
use crate::providers::SummarizationProvider;
use crate::store::{AssetUpdate, RecordStore, Stage};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs one summary job: precondition check, optional redo reset, provider
/// call, persist.
pub struct SummaryOrchestrator {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn SummarizationProvider>,
}

impl SummaryOrchestrator {
    pub fn new(store: Arc<dyn RecordStore>, provider: Arc<dyn SummarizationProvider>) -> Self {
        Self { store, provider }
    }

    /// Run the job. A failed run resets summary progress to 0. A redo that
    /// fails leaves the asset with no summary at all: the previous one was
    /// cleared before the provider call.
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
                    .update_progress(asset_id, Stage::Summary, 0)
                    .await
                {
                    tracing::error!(
                        "Could not reset summary progress for {}: {}",
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

        let transcript = asset
            .transcription
            .as_ref()
            .filter(|t| !t.text.trim().is_empty())
            .map(|t| t.text.clone())
            .ok_or_else(|| {
                PipelineError::InvalidState(format!("asset {} has no usable transcription", asset_id))
            })?;

        if asset.summary.is_some() {
            tracing::info!("Redo: clearing previous summary for {}", asset_id);
            self.store
                .update(asset_id, AssetUpdate::clear_summary())
                .await?;
        }

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        self.store
            .update_progress(asset_id, Stage::Summary, progress::SUMMARY_STARTED)
            .await?;

        let summary = self.provider.summarize(&transcript).await?;

        self.store
            .update_progress(asset_id, Stage::Summary, progress::RESULT_RECEIVED)
            .await?;

        self.store
            .update(asset_id, AssetUpdate::summary_result(summary))
            .await?
            .ok_or_else(|| PipelineError::NotFound(asset_id.to_string()))?;

        tracing::info!("Summary for {} persisted", asset_id);
        Ok(())
    }
}
