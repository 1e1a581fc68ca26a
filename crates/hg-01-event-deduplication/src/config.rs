//! Stage configuration from environment variables.

use crate::domain::DEFAULT_INITIAL_CAPACITY;
use serde::Serialize;
use shared_types::NodeId;
use std::env;
use std::str::FromStr;

/// Configuration for the deduplication stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeduplicationConfig {
    /// Pre-sizing hint for the descriptor table
    pub initial_capacity: usize,

    /// Bound of the inbound queue (events, threshold updates, clears)
    pub input_queue_capacity: usize,

    /// Bound of the queue towards consensus intake
    pub output_queue_capacity: usize,

    /// Local node, attached to stage log lines
    pub node_id: NodeId,
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            input_queue_capacity: 1000,
            output_queue_capacity: 1000,
            node_id: NodeId::default(),
        }
    }
}

impl DeduplicationConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HG_DEDUP_INITIAL_CAPACITY`: descriptor table hint (default: 1024)
    /// - `HG_DEDUP_INPUT_QUEUE`: inbound queue bound (default: 1000)
    /// - `HG_DEDUP_OUTPUT_QUEUE`: outbound queue bound (default: 1000)
    /// - `HG_NODE_ID`: local node index (default: 0)
    ///
    /// Missing or unparsable values fall back to the default. Queue bounds of
    /// zero are raised to one since tokio channels cannot be unbuffered.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_capacity: env_or("HG_DEDUP_INITIAL_CAPACITY", defaults.initial_capacity),
            input_queue_capacity: env_or("HG_DEDUP_INPUT_QUEUE", defaults.input_queue_capacity)
                .max(1),
            output_queue_capacity: env_or("HG_DEDUP_OUTPUT_QUEUE", defaults.output_queue_capacity)
                .max(1),
            node_id: NodeId::new(env_or("HG_NODE_ID", defaults.node_id.id())),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
