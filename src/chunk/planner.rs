use crate::error::PipelineError;

/// One time-bounded slice of the source recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSpec {
    /// Zero-based position in the plan; also the assembly order.
    pub index: usize,
    pub start_secs: f64,
    pub duration_secs: f64,
}

#[derive(Debug, Clone)]
pub struct ChunkPlan {
    pub chunks: Vec<ChunkSpec>,
    pub total_duration_secs: f64,
}

impl ChunkPlan {
    /// True when the file fits the provider limit as-is and no physical
    /// splitting is needed.
    pub fn is_passthrough(&self) -> bool {
        self.chunks.len() == 1
    }
}

/// Decide chunk boundaries for a recording of `total_duration_secs` seconds
/// and `file_size_bytes` bytes, capping each chunk at `max_chunk_bytes`.
pub fn plan(
    total_duration_secs: f64,
    file_size_bytes: u64,
    max_chunk_bytes: u64,
) -> Result<ChunkPlan, PipelineError> {
    if !total_duration_secs.is_finite() || total_duration_secs <= 0.0 {
        return Err(PipelineError::ProbeFailure(format!(
            "unusable source duration: {}",
            total_duration_secs
        )));
    }

    if file_size_bytes <= max_chunk_bytes {
        return Ok(ChunkPlan {
            chunks: vec![ChunkSpec {
                index: 0,
                start_secs: 0.0,
                duration_secs: total_duration_secs,
            }],
            total_duration_secs,
        });
    }

    // size > max implies at least two chunks
    let chunk_count = file_size_bytes.div_ceil(max_chunk_bytes) as usize;
    let chunk_duration = total_duration_secs / chunk_count as f64;

    let mut chunks = Vec::with_capacity(chunk_count);
    for index in 0..chunk_count {
        let start_secs = index as f64 * chunk_duration;
        // Clamp the tail so the sum never exceeds the source duration.
        let duration_secs = if index == chunk_count - 1 {
            total_duration_secs - start_secs
        } else {
            chunk_duration
        };
        chunks.push(ChunkSpec {
            index,
            start_secs,
            duration_secs,
        });
    }

    tracing::info!(
        "Planned {} chunks of ~{:.2}s for {} bytes",
        chunk_count,
        chunk_duration,
        file_size_bytes
    );

    Ok(ChunkPlan {
        chunks,
        total_duration_secs,
    })
}
