use super::{SummaryOrchestrator, TranscriptionOrchestrator};
use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::media::FfmpegTool;
use crate::providers::{OpenAiSummarizer, OpenAiTranscriber};
use crate::store::{RecordStore, Stage};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Immediate acknowledgment returned by a launch call. Completion is only
/// observable by polling the asset's progress/result fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchAck {
    pub asset_id: String,
    pub stage: Stage,
}

type RunningJobs = Arc<Mutex<HashMap<(String, Stage), CancellationToken>>>;

/// Validates preconditions, enforces one job per asset per stage, and spawns
/// orchestrator runs as detached tasks whose failures land in the log sink.
pub struct JobLauncher {
    store: Arc<dyn RecordStore>,
    transcription: Arc<TranscriptionOrchestrator>,
    summary: Arc<SummaryOrchestrator>,
    running: RunningJobs,
}

/// Releases the running-job token when the spawned task finishes, on every
/// path out of it.
struct RunGuard {
    running: RunningJobs,
    key: (String, Stage),
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Ok(mut running) = self.running.lock() {
            running.remove(&self.key);
        }
    }
}

impl JobLauncher {
    pub fn new(
        store: Arc<dyn RecordStore>,
        transcription: Arc<TranscriptionOrchestrator>,
        summary: Arc<SummaryOrchestrator>,
    ) -> Self {
        Self {
            store,
            transcription,
            summary,
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Wire up the full pipeline from configuration: ffmpeg media tool and
    /// OpenAI providers over the given record store.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, PipelineError> {
        let api_key = config.openai_api_key.clone().ok_or_else(|| {
            PipelineError::InvalidState("OPENAI_API_KEY is not configured".to_string())
        })?;

        let media = Arc::new(FfmpegTool::new(
            config.ffmpeg_bin.clone(),
            config.ffprobe_bin.clone(),
        ));
        let transcription = Arc::new(TranscriptionOrchestrator::new(
            store.clone(),
            media,
            Arc::new(OpenAiTranscriber::new(api_key.clone())),
            config.max_chunk_bytes,
        ));
        let summary = Arc::new(SummaryOrchestrator::new(
            store.clone(),
            Arc::new(OpenAiSummarizer::new(api_key)),
        ));

        Ok(Self::new(store, transcription, summary))
    }

    /// Start a transcription job in the background and return immediately.
    pub async fn start_transcription(&self, asset_id: &str) -> Result<LaunchAck, PipelineError> {
        let asset = self
            .store
            .get(asset_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(asset_id.to_string()))?;

        let cancel = self.claim(&asset.id, Stage::Transcription)?;

        let orchestrator = self.transcription.clone();
        let running = self.running.clone();
        let id = asset.id.clone();
        tokio::spawn(async move {
            let _guard = RunGuard {
                running,
                key: (id.clone(), Stage::Transcription),
            };
            if let Err(e) = orchestrator.run(&id, cancel).await {
                tracing::error!("Background transcription of {} failed: {}", id, e);
            }
        });

        tracing::info!("Transcription started for {}", asset.id);
        Ok(LaunchAck {
            asset_id: asset.id,
            stage: Stage::Transcription,
        })
    }

    /// Start a summary job in the background and return immediately. Fails
    /// with `InvalidState` when the asset has no transcription yet.
    pub async fn start_summary(&self, asset_id: &str) -> Result<LaunchAck, PipelineError> {
        let asset = self
            .store
            .get(asset_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(asset_id.to_string()))?;

        if asset.transcription.is_none() {
            return Err(PipelineError::InvalidState(format!(
                "asset {} has no transcription to summarize",
                asset_id
            )));
        }

        let cancel = self.claim(&asset.id, Stage::Summary)?;

        let orchestrator = self.summary.clone();
        let running = self.running.clone();
        let id = asset.id.clone();
        tokio::spawn(async move {
            let _guard = RunGuard {
                running,
                key: (id.clone(), Stage::Summary),
            };
            if let Err(e) = orchestrator.run(&id, cancel).await {
                tracing::error!("Background summary of {} failed: {}", id, e);
            }
        });

        tracing::info!("Summary started for {}", asset.id);
        Ok(LaunchAck {
            asset_id: asset.id,
            stage: Stage::Summary,
        })
    }

    /// Request cancellation of an in-flight job. Returns false when nothing
    /// was running for that asset and stage.
    pub fn cancel(&self, asset_id: &str, stage: Stage) -> bool {
        let Ok(running) = self.running.lock() else {
            return false;
        };
        match running.get(&(asset_id.to_string(), stage)) {
            Some(token) => {
                tracing::info!("Cancelling {} job for {}", stage, asset_id);
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, asset_id: &str, stage: Stage) -> bool {
        self.running
            .lock()
            .map(|r| r.contains_key(&(asset_id.to_string(), stage)))
            .unwrap_or(false)
    }

    /// Check-and-set the per-asset-per-stage running token.
    fn claim(&self, asset_id: &str, stage: Stage) -> Result<CancellationToken, PipelineError> {
        let mut running = self
            .running
            .lock()
            .map_err(|e| PipelineError::Storage(e.to_string()))?;

        let key = (asset_id.to_string(), stage);
        if running.contains_key(&key) {
            return Err(PipelineError::AlreadyRunning {
                asset_id: asset_id.to_string(),
                stage: stage.as_str(),
            });
        }

        let token = CancellationToken::new();
        running.insert(key, token.clone());
        Ok(token)
    }
}
