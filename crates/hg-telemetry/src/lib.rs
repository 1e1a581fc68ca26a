//! # Hashgraph Telemetry
//!
//! Logging and metrics setup shared by node components.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter` and a JSON or
//!   pretty formatter
//! - **Metrics**: a process-wide Prometheus `REGISTRY` plus text encoding
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hg_telemetry::{init_logging, log_stage_event, TelemetryConfig};
//!
//! fn main() -> Result<(), hg_telemetry::TelemetryError> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     log_stage_event!(info, "hg-01", 0u64, "stage started");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HG_SERVICE_NAME` | `hashgraph-node` | Service name in logs |
//! | `HG_NODE_ID` | `0` | Node identifier |
//! | `HG_LOG_LEVEL` | `info` | Log filter (`RUST_LOG` wins when set) |
//! | `HG_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `HG_JSON_LOGS` | `false` | JSON output |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, encode_registry, register_collector, REGISTRY};

#[doc(hidden)]
pub use tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("prometheus metrics error: {0}")]
    Metrics(String),
}
