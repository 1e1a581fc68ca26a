//! Inbound ports (API) for the Event Deduplication subsystem.

use crate::domain::DeduplicationError;
use shared_types::GossipEvent;

/// Primary API of the deduplication stage.
///
/// All three operations arrive on the same inbound queue and must be called
/// from one thread at a time, hence `&mut self` and no `Sync` bound.
pub trait EventDeduplicationApi: Send {
    /// Filter one event.
    ///
    /// # Returns
    /// The same event if it should be forwarded, `None` if it was dropped
    /// as ancient or as an exact duplicate.
    fn handle_event(&mut self, event: GossipEvent) -> Option<GossipEvent>;

    /// Raise the ancient threshold and evict everything below it.
    ///
    /// # Returns
    /// Number of descriptors evicted.
    ///
    /// # Errors
    /// `DeduplicationError::FloorRegression` if `generation` is lower than the
    /// current threshold. State is left unchanged.
    fn set_minimum_generation_non_ancient(
        &mut self,
        generation: u64,
    ) -> Result<usize, DeduplicationError>;

    /// Forget every observed event. The ancient threshold is kept.
    fn clear(&mut self);
}
