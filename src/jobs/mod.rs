// src/jobs/mod.rs
// Background jobs: orchestrators, launcher, progress model

mod launcher;
pub mod progress;
mod summary;
mod transcription;

pub use launcher::{JobLauncher, LaunchAck};
pub use summary::SummaryOrchestrator;
pub use transcription::{merge_fragments, TranscriptFragment, TranscriptionOrchestrator};
