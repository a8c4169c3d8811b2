// src/providers/mod.rs
// Remote text-producing services

mod openai;

pub use openai::{OpenAiSummarizer, OpenAiTranscriber};

use crate::error::PipelineError;
use async_trait::async_trait;

/// Remote speech-to-text service.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe one audio payload to text.
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, PipelineError>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Remote text summarization service.
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    /// Summarize a transcript to text.
    async fn summarize(&self, transcript: &str) -> Result<String, PipelineError>;

    /// Provider name
    fn name(&self) -> &str;
}
