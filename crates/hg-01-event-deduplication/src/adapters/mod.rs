//! Adapters Layer (Driven Adapters)
//!
//! - `DefaultIntakeEventCounter` - in-process per-peer intake accounting
//! - `PrometheusMetrics` - counter export (feature `metrics`)

pub mod intake_counter;
#[cfg(feature = "metrics")]
pub mod prometheus_export;

pub use intake_counter::DefaultIntakeEventCounter;
#[cfg(feature = "metrics")]
pub use prometheus_export::PrometheusMetrics;
