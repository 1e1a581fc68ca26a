//! Prometheus registry and helpers.
//!
//! Metric names follow `hg_<component>_<metric>_<unit>`. Components own
//! their collectors and register them here at startup.

use crate::TelemetryError;
use lazy_static::lazy_static;
use prometheus::{core::Collector, Encoder, Registry, TextEncoder};

lazy_static! {
    /// Process-wide metrics registry
    pub static ref REGISTRY: Registry = Registry::new();
}

/// Register a collector with the process-wide registry.
pub fn register_collector(collector: Box<dyn Collector>) -> Result<(), TelemetryError> {
    REGISTRY
        .register(collector)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))
}

/// Encode every metric in the process-wide registry as Prometheus text.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

/// Encode every metric in `registry` as Prometheus text.
pub fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;

    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}
