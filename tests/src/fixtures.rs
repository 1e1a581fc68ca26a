//! Seeded gossip workloads.
//!
//! A workload mixes first sightings, relayed copies of earlier events and
//! re-signed copies of earlier descriptors, the three cases the intake
//! deduplicator has to tell apart.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{EventDescriptor, GossipEvent, NodeId};
use std::collections::HashSet;
use std::sync::Once;

use hg_telemetry::{init_logging, TelemetryConfig};

static LOGGING: Once = Once::new();

/// Install the process-wide log subscriber once per test binary.
///
/// Reads `HG_LOG_LEVEL`/`RUST_LOG`, so `RUST_LOG=debug cargo test` shows stage
/// logs. A subscriber installed by someone else is left in place.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = init_logging(&TelemetryConfig::from_env());
    });
}

/// Shape of a generated workload.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub events: usize,
    pub creators: u64,
    pub peers: u64,
    /// Generations covered; generation grows with position in the stream
    pub generations: u64,
    /// Probability that an event is a relayed copy of an earlier one
    pub duplicate_ratio: f64,
    /// Probability that an event re-signs an earlier descriptor
    pub disparate_ratio: f64,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            events: 1_000,
            creators: 16,
            peers: 8,
            generations: 100,
            duplicate_ratio: 0.3,
            disparate_ratio: 0.02,
        }
    }
}

/// Generate a deterministic workload from `seed`.
pub fn generate_workload(seed: u64, spec: WorkloadSpec) -> Vec<GossipEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut events: Vec<GossipEvent> = Vec::with_capacity(spec.events);
    let generations = spec.generations.max(1);

    for i in 0..spec.events {
        let sender = NodeId::new(rng.gen_range(0..spec.peers.max(1)));
        let roll: f64 = rng.gen();

        let event = if !events.is_empty() && roll < spec.duplicate_ratio {
            let original = &events[rng.gen_range(0..events.len())];
            original.clone().relayed_by(sender)
        } else if !events.is_empty() && roll < spec.duplicate_ratio + spec.disparate_ratio {
            let original = &events[rng.gen_range(0..events.len())];
            let mut signature = original.signature().to_vec();
            signature.extend_from_slice(&(i as u64).to_le_bytes());
            original.clone().with_signature(signature).relayed_by(sender)
        } else {
            let creator = NodeId::new(rng.gen_range(0..spec.creators.max(1)));
            let generation = i as u64 * generations / spec.events.max(1) as u64;
            let payload = (i as u64).to_le_bytes().to_vec();
            let signature = rng.gen::<[u8; 8]>().to_vec();
            GossipEvent::new(creator, generation, payload, signature, sender)
        };
        events.push(event);
    }

    events
}

/// Number of distinct (descriptor, signature) pairs with generation at or
/// above `floor`.
pub fn distinct_pairs(events: &[GossipEvent], floor: u64) -> usize {
    events
        .iter()
        .filter(|e| e.generation() >= floor)
        .map(|e| (*e.descriptor(), e.signature().to_vec()))
        .collect::<HashSet<(EventDescriptor, Vec<u8>)>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_is_deterministic() {
        let spec = WorkloadSpec::default();
        assert_eq!(generate_workload(7, spec), generate_workload(7, spec));
    }

    #[test]
    fn test_workload_contains_duplicates() {
        let events = generate_workload(1, WorkloadSpec::default());
        let distinct = distinct_pairs(&events, 0);

        assert_eq!(events.len(), 1_000);
        assert!(distinct < events.len());
        assert!(distinct > events.len() / 2);
    }
}
