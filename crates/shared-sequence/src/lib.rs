//! # Shared Sequence - Windowed Collections
//!
//! Containers whose entries are ordered by a sequence number and dropped in
//! bulk once a monotonically advancing floor passes them.
//!
//! ## Window Model
//!
//! ```text
//!            floor
//!              │
//!   evicted    ▼   resident
//! ─────────────┼──────────────────────────►  sequence number
//!   [3] [4]    │ [5] [6] [6] [9] ...
//! ```
//!
//! - Keys report their own sequence number through [`SequenceKey`].
//! - Keys below the floor are never resident.
//! - Shifting the window is proportional to the number of evicted keys.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod sequence_map;

pub use sequence_map::{SequenceKey, WindowError, WindowedKeyedMultiMap};
