//! Hexagonal ports for the Event Deduplication subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::EventDeduplicationApi;
pub use outbound::{IntakeEventCounter, NoOpIntakeEventCounter};
