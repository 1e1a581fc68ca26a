//! Deduplication error types.

use thiserror::Error;

/// Errors raised by the deduplicator and its pipeline stage.
///
/// Ancient and duplicate events are not errors; they are counted and dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeduplicationError {
    /// The consensus core tried to lower the ancient threshold.
    #[error("minimum generation non-ancient cannot decrease: current {current}, requested {requested}")]
    FloorRegression { current: u64, requested: u64 },

    /// The consensus intake queue was dropped while events were still flowing.
    #[error("downstream consensus intake queue closed")]
    DownstreamClosed,

    /// The stage is no longer accepting input.
    #[error("deduplication stage stopped")]
    StageStopped,

    /// The stage task panicked or was cancelled.
    #[error("deduplication stage task failed: {0}")]
    TaskFailed(String),
}
