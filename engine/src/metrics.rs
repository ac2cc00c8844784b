//! Batch timing instrumentation.
//!
//! The recorder here is strictly observational: the dispatcher drives it as
//! results finalize, and nothing in it influences scheduling, ordering, or
//! retry behavior.

use std::time::Duration;

use tokio::time::Instant;

/// Completion statistics for one executed chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMetrics {
    /// Position of the chunk in execution order, 0-indexed.
    pub chunk_index: usize,
    /// Wall-clock time from the chunk's first call to its last completion.
    pub duration: Duration,
    /// Number of units in the chunk that finalized as successes.
    pub success_count: usize,
    /// Number of units in the chunk that finalized as errors.
    pub error_count: usize,
}

/// Timing recorded across one dispatched batch.
#[derive(Debug, Clone, Default)]
pub struct BatchMetrics {
    /// Wall-clock time from batch start until every unit resolved.
    pub total_duration: Duration,
    /// Elapsed time from batch start to the first finalized result, success
    /// or error. `None` for an empty batch.
    pub first_result_latency: Option<Duration>,
    /// One entry per executed chunk, in execution order. A pipelined batch
    /// reports a single window entry covering the whole batch.
    pub chunks: Vec<ChunkMetrics>,
}

/// Passive recorder owned by one dispatch call.
#[derive(Debug)]
pub(crate) struct BatchTimer {
    started: Instant,
    first_result: Option<Duration>,
    chunks: Vec<ChunkMetrics>,
}

impl BatchTimer {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
            first_result: None,
            chunks: Vec::new(),
        }
    }

    /// The instant the batch started; per-call completion offsets are
    /// measured against it.
    pub(crate) const fn started_at(&self) -> Instant {
        self.started
    }

    /// Records one finalized result at `completed_at` past batch start.
    ///
    /// Keeps the earliest offset seen, regardless of the order completions
    /// are reported in.
    pub(crate) fn record_result(&mut self, completed_at: Duration) {
        if self.first_result.map_or(true, |first| completed_at < first) {
            self.first_result = Some(completed_at);
        }
    }

    pub(crate) fn record_chunk(
        &mut self,
        chunk_index: usize,
        duration: Duration,
        success_count: usize,
        error_count: usize,
    ) {
        self.chunks.push(ChunkMetrics {
            chunk_index,
            duration,
            success_count,
            error_count,
        });
    }

    pub(crate) fn finish(self) -> BatchMetrics {
        BatchMetrics {
            total_duration: self.started.elapsed(),
            first_result_latency: self.first_result,
            chunks: self.chunks,
        }
    }
}
