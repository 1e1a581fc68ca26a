//! # Prometheus Export
//!
//! Enable with the `metrics` feature:
//! ```toml
//! hg-01-event-deduplication = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `hg_intake_duplicate_events_total` - events dropped as exact duplicates
//! - `hg_intake_non_duplicate_events_total` - events forwarded
//! - `hg_intake_disparate_signature_events_total` - extra signatures for a known descriptor
//! - `hg_intake_ancient_events_total` - events dropped as ancient

use crate::metrics::MetricsRecorder;
use prometheus::{IntCounter, Registry};

/// Counters registered against a caller-supplied registry.
#[derive(Clone, Debug)]
pub struct PrometheusMetrics {
    duplicate: IntCounter,
    non_duplicate: IntCounter,
    disparate_signature: IntCounter,
    ancient: IntCounter,
}

impl PrometheusMetrics {
    /// Create the counters and register them with `registry`.
    ///
    /// # Errors
    /// Fails if a counter with the same name is already registered.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let metrics = Self {
            duplicate: IntCounter::new(
                "hg_intake_duplicate_events_total",
                "Events dropped because descriptor and signature were already seen",
            )?,
            non_duplicate: IntCounter::new(
                "hg_intake_non_duplicate_events_total",
                "Events forwarded by the deduplicator",
            )?,
            disparate_signature: IntCounter::new(
                "hg_intake_disparate_signature_events_total",
                "Events whose descriptor was known but whose signature was new",
            )?,
            ancient: IntCounter::new(
                "hg_intake_ancient_events_total",
                "Events dropped because their generation was ancient",
            )?,
        };

        registry.register(Box::new(metrics.duplicate.clone()))?;
        registry.register(Box::new(metrics.non_duplicate.clone()))?;
        registry.register(Box::new(metrics.disparate_signature.clone()))?;
        registry.register(Box::new(metrics.ancient.clone()))?;

        Ok(metrics)
    }
}

impl MetricsRecorder for PrometheusMetrics {
    fn record_duplicate(&self) {
        self.duplicate.inc();
    }

    fn record_non_duplicate(&self) {
        self.non_duplicate.inc();
    }

    fn record_disparate_signature(&self) {
        self.disparate_signature.inc();
    }

    fn record_ancient(&self) {
        self.ancient.inc();
    }
}
