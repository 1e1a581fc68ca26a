//! # Shared Types Crate
//!
//! Gossip entities shared by every intake stage of the node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-stage types are defined here only.
//! - **Immutable Identity**: an `EventDescriptor` cannot change once built.
//! - **Sender vs Creator**: a `GossipEvent` records which peer delivered it,
//!   separately from the node that created it.

pub mod entities;

pub use entities::*;
