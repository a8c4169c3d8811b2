// src/chunk/mod.rs
// Chunk planning and extraction

mod extractor;
mod planner;

pub use extractor::{ChunkExtractor, ExtractedChunk, ExtractedChunks};
pub use planner::{plan, ChunkPlan, ChunkSpec};
