//! Value objects describing how an event was classified.

use serde::Serialize;

/// Classification of one incoming event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeduplicationOutcome {
    /// First sighting of the descriptor. Forwarded.
    Accepted,
    /// Known descriptor, previously unseen signature. Forwarded and counted
    /// as an anomaly.
    DisparateSignature,
    /// Descriptor and signature already observed. Dropped.
    Duplicate,
    /// Generation below the window floor. Dropped without a map lookup.
    Ancient,
}

impl DeduplicationOutcome {
    /// Whether the event continues to the next stage.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted | Self::DisparateSignature)
    }

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::DisparateSignature => "disparate_signature",
            Self::Duplicate => "duplicate",
            Self::Ancient => "ancient",
        }
    }
}

/// What the deduplicator currently knows about one descriptor.
///
/// ```text
/// [Unseen] ──first sig──→ [SeenOnce] ──new sig──→ [SeenDisparate]
///    ↑                         │                        │
///    └──── window shift / clear ┴────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorState {
    /// Not resident in the window.
    Unseen,
    /// Exactly one signature recorded.
    SeenOnce,
    /// Two or more distinct signatures recorded.
    SeenDisparate { signatures: usize },
}
