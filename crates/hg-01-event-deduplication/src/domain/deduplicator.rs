//! The deduplicator: classifies incoming gossip events against a
//! generation-bounded record of what has already been seen.

use super::errors::DeduplicationError;
use super::invariants::check_all_invariants;
use super::value_objects::{DeduplicationOutcome, DescriptorState};
use crate::metrics::MetricsRecorder;
use crate::ports::{EventDeduplicationApi, IntakeEventCounter};
use shared_sequence::WindowedKeyedMultiMap;
use shared_types::{EventDescriptor, GossipEvent};
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Pre-sizing hint for the descriptor table.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Signatures observed per descriptor, bounded by the ancient threshold.
pub type ObservedEvents = WindowedKeyedMultiMap<EventDescriptor, Vec<u8>>;

/// Drops ancient events and exact duplicates, forwards everything else.
///
/// An event is a duplicate only if both its descriptor and its signature
/// were seen before. A known descriptor with a new signature is forwarded
/// and counted as a disparate signature.
///
/// Not thread-safe. The pipeline stage owns one instance and feeds it from a
/// single queue.
pub struct EventDeduplicator {
    /// Events with a generation below this are ancient.
    minimum_generation_non_ancient: u64,
    observed_events: ObservedEvents,
    intake_counter: Arc<dyn IntakeEventCounter>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl EventDeduplicator {
    pub fn new(
        intake_counter: Arc<dyn IntakeEventCounter>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY, intake_counter, metrics)
    }

    pub fn with_capacity(
        initial_capacity: usize,
        intake_counter: Arc<dyn IntakeEventCounter>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            minimum_generation_non_ancient: 0,
            observed_events: WindowedKeyedMultiMap::new(0, initial_capacity),
            intake_counter,
            metrics,
        }
    }

    /// Classify `event`, record it, and update counters.
    ///
    /// Dropped events (ancient or duplicate) are reported to the intake
    /// counter against the peer that sent them.
    pub fn classify(&mut self, event: &GossipEvent) -> DeduplicationOutcome {
        let outcome = self.record(event);

        match outcome {
            DeduplicationOutcome::Ancient => {
                self.metrics.record_ancient();
                self.intake_counter
                    .event_exited_intake_pipeline(event.sender_id());
            }
            DeduplicationOutcome::Duplicate => {
                self.metrics.record_duplicate();
                self.intake_counter
                    .event_exited_intake_pipeline(event.sender_id());
            }
            DeduplicationOutcome::DisparateSignature => {
                self.metrics.record_disparate_signature();
                self.metrics.record_non_duplicate();
            }
            DeduplicationOutcome::Accepted => {
                self.metrics.record_non_duplicate();
            }
        }

        trace!(
            descriptor = %event.descriptor(),
            sender = %event.sender_id(),
            outcome = outcome.as_str(),
            "event classified"
        );

        outcome
    }

    fn record(&mut self, event: &GossipEvent) -> DeduplicationOutcome {
        if event.generation() < self.minimum_generation_non_ancient {
            return DeduplicationOutcome::Ancient;
        }

        let signatures = match self.observed_events.get_or_create_set(*event.descriptor()) {
            Ok(signatures) => signatures,
            Err(e) => {
                // floor and map are out of step; the event cannot be tracked
                error!(descriptor = %event.descriptor(), error = %e, "descriptor rejected by window");
                return DeduplicationOutcome::Ancient;
            }
        };

        if signatures.contains(event.signature()) {
            return DeduplicationOutcome::Duplicate;
        }

        signatures.insert(event.signature().to_vec());
        let distinct = signatures.len();
        if distinct > 1 {
            debug!(
                descriptor = %event.descriptor(),
                sender = %event.sender_id(),
                signatures = distinct,
                "disparate signature for known descriptor"
            );
            DeduplicationOutcome::DisparateSignature
        } else {
            DeduplicationOutcome::Accepted
        }
    }

    pub fn minimum_generation_non_ancient(&self) -> u64 {
        self.minimum_generation_non_ancient
    }

    /// Number of descriptors currently resident.
    pub fn tracked_descriptors(&self) -> usize {
        self.observed_events.len()
    }

    /// Number of signatures across all resident descriptors.
    pub fn observed_signatures(&self) -> usize {
        self.observed_events.value_count()
    }

    pub fn descriptor_state(&self, descriptor: &EventDescriptor) -> DescriptorState {
        match self.observed_events.get(descriptor).map(|s| s.len()) {
            None | Some(0) => DescriptorState::Unseen,
            Some(1) => DescriptorState::SeenOnce,
            Some(signatures) => DescriptorState::SeenDisparate { signatures },
        }
    }

    pub fn observed_events(&self) -> &ObservedEvents {
        &self.observed_events
    }
}

impl EventDeduplicationApi for EventDeduplicator {
    fn handle_event(&mut self, event: GossipEvent) -> Option<GossipEvent> {
        if self.classify(&event).is_accepted() {
            Some(event)
        } else {
            None
        }
    }

    fn set_minimum_generation_non_ancient(
        &mut self,
        generation: u64,
    ) -> Result<usize, DeduplicationError> {
        let current = self.minimum_generation_non_ancient;
        let evicted = self
            .observed_events
            .shift_window(generation)
            .map_err(|e| {
                error!(
                    current,
                    requested = generation,
                    error = %e,
                    "minimum generation non-ancient moved backwards"
                );
                DeduplicationError::FloorRegression {
                    current,
                    requested: generation,
                }
            })?;
        self.minimum_generation_non_ancient = generation;

        debug!(
            minimum_generation_non_ancient = generation,
            evicted,
            resident = self.observed_events.len(),
            "ancient threshold advanced"
        );
        debug_assert!(check_all_invariants(self).is_ok());

        Ok(evicted)
    }

    fn clear(&mut self) {
        let dropped = self.observed_events.len();
        self.observed_events.clear();
        debug!(dropped, "deduplicator cleared");
    }
}
