//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,

    /// Identifier of this node in the network
    pub node_id: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "hashgraph-node".to_string(),
            node_id: "0".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HG_SERVICE_NAME`: Service name (default: hashgraph-node)
    /// - `HG_NODE_ID`: Node identifier (default: 0)
    /// - `HG_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `HG_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `HG_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();
        let defaults = Self::default();

        Self {
            service_name: env::var("HG_SERVICE_NAME").unwrap_or(defaults.service_name),

            node_id: env::var("HG_NODE_ID").unwrap_or(defaults.node_id),

            log_level: env::var("HG_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: env::var("HG_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.console_output),

            json_logs: env::var("HG_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Service name including the node identifier.
    pub fn full_service_name(&self) -> String {
        format!("{}-{}", self.service_name, self.node_id)
    }
}
