//! Per-peer intake accounting shared between the network layer and the
//! intake stages.

use crate::ports::IntakeEventCounter;
use parking_lot::RwLock;
use shared_types::NodeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Counts, per sending peer, the events still inside the intake pipeline.
///
/// The write lock is only taken the first time a peer is seen. Steady-state
/// increments and decrements run under the read lock.
#[derive(Debug, Default)]
pub struct DefaultIntakeEventCounter {
    counts: RwLock<HashMap<NodeId, AtomicU64>>,
}

impl DefaultIntakeEventCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a known peer set.
    pub fn with_peers(peers: impl IntoIterator<Item = NodeId>) -> Self {
        let counts = peers
            .into_iter()
            .map(|peer| (peer, AtomicU64::new(0)))
            .collect();
        Self {
            counts: RwLock::new(counts),
        }
    }

    /// Events from `peer` still in flight.
    pub fn unprocessed_events(&self, peer: NodeId) -> u64 {
        self.counts
            .read()
            .get(&peer)
            .map_or(0, |count| count.load(Ordering::Acquire))
    }
}

impl IntakeEventCounter for DefaultIntakeEventCounter {
    fn event_entered_intake_pipeline(&self, peer: NodeId) {
        if let Some(count) = self.counts.read().get(&peer) {
            count.fetch_add(1, Ordering::AcqRel);
            return;
        }

        self.counts
            .write()
            .entry(peer)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::AcqRel);
    }

    fn event_exited_intake_pipeline(&self, peer: NodeId) {
        let counts = self.counts.read();
        let Some(count) = counts.get(&peer) else {
            warn!(%peer, "intake exit for peer with no recorded events");
            return;
        };

        let decremented = count.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
            n.checked_sub(1)
        });
        if decremented.is_err() {
            warn!(%peer, "intake exit would underflow; count left at zero");
        }
    }

    fn has_unprocessed_events(&self, peer: NodeId) -> bool {
        self.unprocessed_events(peer) > 0
    }

    fn reset(&self) {
        self.counts.write().clear();
    }
}
