// src/providers/openai.rs
// OpenAI adapters: Whisper transcription + chat-completion summaries

use super::{SummarizationProvider, TranscriptionProvider};
use crate::error::PipelineError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const TRANSCRIPTION_MODEL: &str = "whisper-1";
const SUMMARY_MODEL: &str = "gpt-4o";
const UPLOAD_TIMEOUT_SECS: u64 = 300;
const CHAT_TIMEOUT_SECS: u64 = 120;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant that condenses audio \
transcripts into their key points. Also give a very brief editorial-style \
overview of the main topic or topics of the conversation.";

pub struct OpenAiTranscriber {
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiTranscriber {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        tracing::info!("OpenAI transcriber initialized");
        Self { api_key, client }
    }

    /// Strip `[mm:ss]`-style timestamp artifacts some Whisper responses carry
    /// and collapse the remaining whitespace.
    fn clean_transcript(text: &str) -> String {
        static TS_RE: OnceLock<Regex> = OnceLock::new();
        let re = TS_RE.get_or_init(|| {
            Regex::new(r"\[\d{2}:\d{2}.*?\]|\(\d{2}:\d{2}\)").expect("valid timestamp regex")
        });
        let stripped = re.replace_all(text, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl TranscriptionProvider for OpenAiTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, PipelineError> {
        if audio.is_empty() {
            return Err(PipelineError::TranscriptionProvider(
                "empty audio payload".to_string(),
            ));
        }

        tracing::info!(
            "Transcribing {} ({} bytes) via {}",
            file_name,
            audio.len(),
            TRANSCRIPTION_MODEL
        );

        let file_part = multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| PipelineError::TranscriptionProvider(e.to_string()))?;

        let form = multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", file_part);

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::TranscriptionProvider("request timeout".to_string())
                } else {
                    PipelineError::TranscriptionProvider(format!("network: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::TranscriptionProvider(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::TranscriptionProvider(format!("parse: {}", e)))?;

        Ok(Self::clean_transcript(&parsed.text))
    }

    fn name(&self) -> &str {
        "OpenAI Whisper"
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct OpenAiSummarizer {
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiSummarizer {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CHAT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        tracing::info!("OpenAI summarizer initialized");
        Self { api_key, client }
    }
}

#[async_trait]
impl SummarizationProvider for OpenAiSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String, PipelineError> {
        let request = ChatRequest {
            model: SUMMARY_MODEL.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SUMMARY_SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: format!(
                        "Summarize this down to what matters most:\n\n{}",
                        transcript
                    ),
                },
            ],
            max_tokens: 2000,
            temperature: 0.5,
        };

        let response = self
            .client
            .post(CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::SummaryProvider(format!("network: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::SummaryProvider(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::SummaryProvider(format!("parse: {}", e)))?;

        chat.choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| PipelineError::SummaryProvider("empty completion".to_string()))
    }

    fn name(&self) -> &str {
        "OpenAI GPT-4o"
    }
}
