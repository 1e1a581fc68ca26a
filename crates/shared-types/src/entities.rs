//! # Core Domain Entities
//!
//! Defines the gossip-layer entities shared by every intake stage.
//!
//! ## Clusters
//!
//! - **Identity**: `NodeId`, `Hash`
//! - **Events**: `EventDescriptor`, `GossipEvent`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_sequence::SequenceKey;
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte hash (SHA-256 over the event's hashed data).
pub type Hash = [u8; 32];

/// Unique identifier for a node in the address book.
///
/// Used both for the creator of an event and for the peer that delivered it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Creates a node ID from its address book index.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric identifier.
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// =============================================================================
// CLUSTER B: EVENTS
// =============================================================================

/// Identity of a gossip event, independent of its signature.
///
/// Two descriptors are equal iff creator, hash and generation are all equal.
/// Fields are private: a descriptor never changes after construction.
///
/// # Example
///
/// ```rust
/// use shared_types::{EventDescriptor, NodeId};
///
/// let descriptor = EventDescriptor::new(NodeId(1), [0xAA; 32], 5);
/// assert_eq!(descriptor.generation(), 5);
/// assert_eq!(descriptor, EventDescriptor::new(NodeId(1), [0xAA; 32], 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDescriptor {
    creator: NodeId,
    hash: Hash,
    generation: u64,
}

impl EventDescriptor {
    /// Creates a descriptor from its three identifying parts.
    pub const fn new(creator: NodeId, hash: Hash, generation: u64) -> Self {
        Self {
            creator,
            hash,
            generation,
        }
    }

    /// Creates a descriptor whose hash is computed from the event payload.
    pub fn for_payload(creator: NodeId, generation: u64, payload: &[u8]) -> Self {
        Self::new(creator, compute_event_hash(creator, generation, payload), generation)
    }

    /// The node that created the event.
    pub const fn creator(&self) -> NodeId {
        self.creator
    }

    /// Hash of the event's hashed data.
    pub const fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Per-creator sequence number used as the ancientness axis.
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}",
            self.creator,
            self.generation,
            hex::encode(&self.hash[..4])
        )
    }
}

impl SequenceKey for EventDescriptor {
    fn sequence_number(&self) -> u64 {
        self.generation
    }
}

/// Compute the content hash of an event.
///
/// Preimage: `creator (LE u64) || generation (LE u64) || payload`.
pub fn compute_event_hash(creator: NodeId, generation: u64, payload: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(creator.0.to_le_bytes());
    hasher.update(generation.to_le_bytes());
    hasher.update(payload);
    hasher.finalize().into()
}

/// A consensus event as received from gossip.
///
/// The `sender_id` is the peer that delivered this copy, which is not
/// necessarily the creator. The generation is stored alongside the
/// descriptor for fast access and always equals `descriptor.generation()`.
/// It is never serialized; deserialization recomputes it from the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GossipEventFields")]
pub struct GossipEvent {
    descriptor: EventDescriptor,
    #[serde(skip_serializing)]
    generation: u64,
    signature: Vec<u8>,
    sender_id: NodeId,
    payload: Vec<u8>,
}

/// Serialized form of a `GossipEvent`.
#[derive(Deserialize)]
struct GossipEventFields {
    descriptor: EventDescriptor,
    signature: Vec<u8>,
    sender_id: NodeId,
    payload: Vec<u8>,
}

impl From<GossipEventFields> for GossipEvent {
    fn from(fields: GossipEventFields) -> Self {
        Self {
            generation: fields.descriptor.generation(),
            descriptor: fields.descriptor,
            signature: fields.signature,
            sender_id: fields.sender_id,
            payload: fields.payload,
        }
    }
}

impl GossipEvent {
    /// Builds an event from its payload, hashing it into a descriptor.
    pub fn new(
        creator: NodeId,
        generation: u64,
        payload: Vec<u8>,
        signature: Vec<u8>,
        sender_id: NodeId,
    ) -> Self {
        let descriptor = EventDescriptor::for_payload(creator, generation, &payload);
        Self {
            descriptor,
            generation,
            signature,
            sender_id,
            payload,
        }
    }

    /// Builds an event around an existing descriptor with an empty payload.
    pub fn from_descriptor(
        descriptor: EventDescriptor,
        signature: Vec<u8>,
        sender_id: NodeId,
    ) -> Self {
        Self {
            generation: descriptor.generation(),
            descriptor,
            signature,
            sender_id,
            payload: Vec::new(),
        }
    }

    /// Builder method: the same event relayed by a different peer.
    pub fn relayed_by(mut self, sender_id: NodeId) -> Self {
        self.sender_id = sender_id;
        self
    }

    /// Builder method: replace the signature bytes.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    pub fn descriptor(&self) -> &EventDescriptor {
        &self.descriptor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Raw signature bytes. Never verified at the intake layer.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn sender_id(&self) -> NodeId {
        self.sender_id
    }

    pub fn creator(&self) -> NodeId {
        self.descriptor.creator()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
