//! Progress checkpoints shared by both stages. Values are percentages;
//! within one run they only move forward, and a failed run resets to 0.

/// Source duration probed.
pub const PROBED: u8 = 5;
/// Chunk plan computed, extraction starting.
pub const PLANNED: u8 = 10;
/// Pass-through file handed to the provider.
pub const SUBMITTED: u8 = 30;
/// Provider result in hand, about to persist.
pub const RESULT_RECEIVED: u8 = 80;
/// Result persisted.
pub const DONE: u8 = 100;

/// Summary request handed to the provider.
pub const SUMMARY_STARTED: u8 = 10;

/// Share of the bar reserved for per-chunk transcription.
const CHUNK_SPAN: f64 = 70.0;

/// Progress after `completed` of `total` chunks have been transcribed.
/// Lands exactly on `RESULT_RECEIVED` once the last chunk is done.
pub fn chunk_progress(completed: usize, total: usize) -> u8 {
    debug_assert!(total > 0 && completed <= total);
    (PLANNED as f64 + completed as f64 * CHUNK_SPAN / total as f64).round() as u8
}
