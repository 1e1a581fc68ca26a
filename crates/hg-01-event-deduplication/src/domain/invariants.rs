//! Structural invariants of the deduplicator.

use super::deduplicator::EventDeduplicator;

/// INVARIANT-1: Residency
/// No descriptor below the ancient threshold is resident.
pub fn invariant_no_ancient_residents(dedup: &EventDeduplicator) -> bool {
    let threshold = dedup.minimum_generation_non_ancient();
    dedup
        .observed_events()
        .lowest_sequence_number()
        .map_or(true, |lowest| lowest >= threshold)
}

/// INVARIANT-2: Non-empty sets
/// Every resident descriptor has at least one recorded signature.
pub fn invariant_no_empty_signature_sets(dedup: &EventDeduplicator) -> bool {
    dedup
        .observed_events()
        .iter()
        .all(|(_, signatures)| !signatures.is_empty())
}

/// INVARIANT-3: Threshold sync
/// The window floor equals the ancient threshold.
pub fn invariant_floor_in_sync(dedup: &EventDeduplicator) -> bool {
    dedup.observed_events().floor() == dedup.minimum_generation_non_ancient()
}

#[derive(Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    AncientResident,
    EmptySignatureSet,
    FloorOutOfSync,
}

pub fn check_all_invariants(dedup: &EventDeduplicator) -> Result<(), InvariantViolation> {
    if !invariant_no_ancient_residents(dedup) {
        return Err(InvariantViolation::AncientResident);
    }

    if !invariant_no_empty_signature_sets(dedup) {
        return Err(InvariantViolation::EmptySignatureSet);
    }

    if !invariant_floor_in_sync(dedup) {
        return Err(InvariantViolation::FloorOutOfSync);
    }

    Ok(())
}
