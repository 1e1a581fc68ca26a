//! Metrics hooks for event deduplication
//!
//! Counters are written by the single stage thread and may be read from any
//! thread by a reporting task, so every counter is atomic.
//!
//! ## Usage
//!
//! ```ignore
//! use hg_01_event_deduplication::metrics::DeduplicationMetrics;
//!
//! let metrics = Arc::new(DeduplicationMetrics::new());
//! let deduplicator = EventDeduplicator::new(counter, metrics.clone());
//!
//! // from a reporting task
//! let snapshot = metrics.snapshot();
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sink for deduplication counters.
///
/// Implement this trait to forward counts to Prometheus or another metrics
/// system. See `adapters::PrometheusMetrics` (feature `metrics`).
pub trait MetricsRecorder: Send + Sync {
    /// An event was dropped because its descriptor and signature were known.
    fn record_duplicate(&self);

    /// An event was forwarded.
    fn record_non_duplicate(&self);

    /// A known descriptor arrived with a signature not seen before.
    fn record_disparate_signature(&self);

    /// An event was dropped because it was ancient.
    fn record_ancient(&self);
}

/// In-process deduplication counters.
#[derive(Debug, Default)]
pub struct DeduplicationMetrics {
    /// Events dropped as exact duplicates
    pub duplicate_events: AtomicU64,
    /// Events forwarded downstream
    pub non_duplicate_events: AtomicU64,
    /// Additional signatures observed for a known descriptor
    pub disparate_signature_events: AtomicU64,
    /// Events dropped as ancient
    pub ancient_events: AtomicU64,
}

impl DeduplicationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            duplicate_events: self.duplicate_events.load(Ordering::Relaxed),
            non_duplicate_events: self.non_duplicate_events.load(Ordering::Relaxed),
            disparate_signature_events: self.disparate_signature_events.load(Ordering::Relaxed),
            ancient_events: self.ancient_events.load(Ordering::Relaxed),
        }
    }

    /// Fraction of non-ancient events that were duplicates.
    pub fn duplicate_ratio(&self) -> f64 {
        let duplicates = self.duplicate_events.load(Ordering::Relaxed);
        let forwarded = self.non_duplicate_events.load(Ordering::Relaxed);
        let total = duplicates + forwarded;
        if total > 0 {
            duplicates as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.duplicate_events.store(0, Ordering::Relaxed);
        self.non_duplicate_events.store(0, Ordering::Relaxed);
        self.disparate_signature_events.store(0, Ordering::Relaxed);
        self.ancient_events.store(0, Ordering::Relaxed);
    }
}

impl MetricsRecorder for DeduplicationMetrics {
    fn record_duplicate(&self) {
        self.duplicate_events.fetch_add(1, Ordering::Relaxed);
    }

    fn record_non_duplicate(&self) {
        self.non_duplicate_events.fetch_add(1, Ordering::Relaxed);
    }

    fn record_disparate_signature(&self) {
        self.disparate_signature_events.fetch_add(1, Ordering::Relaxed);
    }

    fn record_ancient(&self) {
        self.ancient_events.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub duplicate_events: u64,
    pub non_duplicate_events: u64,
    pub disparate_signature_events: u64,
    pub ancient_events: u64,
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_duplicate(&self) {}
    fn record_non_duplicate(&self) {}
    fn record_disparate_signature(&self) {}
    fn record_ancient(&self) {}
}
