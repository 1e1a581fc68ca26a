//! # Event Deduplication Subsystem
//!
//! **Subsystem ID:** hg-01
//! **Position:** gossip intake → *deduplication* → consensus intake
//!
//! ## Purpose
//!
//! Drops gossip events that are ancient or that were already received, and
//! forwards everything else unchanged. An event is identified by its
//! descriptor (creator, hash, generation) *and* its signature: a known
//! descriptor arriving with a new signature is forwarded, because the
//! signature may be the valid one, and is counted as a disparate signature.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | No descriptor below the ancient threshold is resident | `WindowedKeyedMultiMap::get_or_create_set` refuses, `shift_window` evicts |
//! | INVARIANT-2 | The ancient threshold never decreases | `set_minimum_generation_non_ancient` returns `FloorRegression` |
//! | INVARIANT-3 | An event is forwarded at most once per (descriptor, signature) | `EventDeduplicator::classify` |
//! | INVARIANT-4 | Every dropped event is released from intake accounting | `classify`, `DeduplicationStage::forward` |
//!
//! ## Classification
//!
//! ```text
//!                      generation < threshold ──→ [Ancient]   drop
//!                     /
//! event ──→ lookup ──┤── (D, S) known ──────────→ [Duplicate] drop
//!                     \
//!                      (D, S) new ──┬── first S for D ──→ [Accepted]           forward
//!                                   └── other S seen  ──→ [DisparateSignature] forward
//! ```
//!
//! ## Outbound Dependencies
//!
//! | Component | Trait | Purpose |
//! |-----------|-------|---------|
//! | Intake accounting | `IntakeEventCounter` | Per-peer in-flight counts |
//! | Metrics | `MetricsRecorder` | Duplicate / disparate / ancient counters |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  service.rs  - DeduplicationStage (tokio task, bounded queues)  │
//! │  adapters/   - DefaultIntakeEventCounter, PrometheusMetrics     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - EventDeduplicationApi trait                │
//! │  ports/outbound.rs - IntakeEventCounter trait                   │
//! │  metrics.rs        - MetricsRecorder trait                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/deduplicator.rs  - EventDeduplicator                    │
//! │  domain/value_objects.rs - DeduplicationOutcome, DescriptorState│
//! │  domain/invariants.rs    - structural checks                    │
//! │  domain/errors.rs        - DeduplicationError enum              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let counter = Arc::new(DefaultIntakeEventCounter::new());
//! let metrics = Arc::new(DeduplicationMetrics::new());
//! let dedup = EventDeduplicator::new(counter.clone(), metrics.clone());
//!
//! let (stage, mut to_consensus) =
//!     DeduplicationStage::spawn(dedup, counter, &DeduplicationConfig::from_env());
//! stage.submit_event(event).await?;
//! stage.advance_window(42).await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::DefaultIntakeEventCounter;
#[cfg(feature = "metrics")]
pub use adapters::PrometheusMetrics;
pub use config::DeduplicationConfig;
pub use domain::{
    DeduplicationError, DeduplicationOutcome, DescriptorState, EventDeduplicator,
    DEFAULT_INITIAL_CAPACITY,
};
pub use metrics::{DeduplicationMetrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{EventDeduplicationApi, IntakeEventCounter, NoOpIntakeEventCounter};
pub use service::{
    DeduplicationStage, DeduplicationStageHandle, DeduplicatorInput, StageReport,
};
