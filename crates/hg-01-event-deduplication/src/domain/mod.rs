//! # Domain Layer for Event Deduplication
//!
//! Synchronous logic with no I/O. The pipeline stage in `service` is the only
//! caller that touches queues.
//!
//! ## Contents
//!
//! - **deduplicator**: `EventDeduplicator`, the classifier itself
//! - **value_objects**: Classification results (`DeduplicationOutcome`, `DescriptorState`)
//! - **invariants**: Structural checks run after every threshold advance
//! - **errors**: `DeduplicationError`

mod deduplicator;
mod errors;
mod invariants;
mod value_objects;

pub use deduplicator::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
