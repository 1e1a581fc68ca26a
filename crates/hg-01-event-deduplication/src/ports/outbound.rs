//! Outbound ports (SPI) for the Event Deduplication subsystem.

use shared_types::NodeId;

/// Per-peer accounting of events inside the intake pipeline.
///
/// The network layer calls `event_entered_intake_pipeline` for every event it
/// receives. Every stage that drops an event calls
/// `event_exited_intake_pipeline` for the peer that *sent* it, so the count
/// reaches zero once all of a peer's events have been forwarded or dropped.
pub trait IntakeEventCounter: Send + Sync {
    /// An event from `peer` entered the pipeline.
    fn event_entered_intake_pipeline(&self, peer: NodeId);

    /// An event from `peer` left the pipeline without being forwarded.
    fn event_exited_intake_pipeline(&self, peer: NodeId);

    /// Whether any event from `peer` is still in flight.
    fn has_unprocessed_events(&self, peer: NodeId) -> bool;

    /// Forget all in-flight events (restart / reconnect).
    fn reset(&self);
}

/// Counter for wiring a pipeline without intake accounting.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpIntakeEventCounter;

impl IntakeEventCounter for NoOpIntakeEventCounter {
    fn event_entered_intake_pipeline(&self, _peer: NodeId) {}
    fn event_exited_intake_pipeline(&self, _peer: NodeId) {}

    fn has_unprocessed_events(&self, _peer: NodeId) -> bool {
        false
    }

    fn reset(&self) {}
}
