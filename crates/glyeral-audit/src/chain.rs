//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. log_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the decision record

use sha2::{Digest, Sha256};

use glyeral_contracts::{
    decision::DecisionRecord,
    error::{GlyeralError, GlyeralResult},
};

use crate::event::AuditEvent;

/// Compute the SHA-256 hash for one decision event.
///
/// Returns a lowercase 64-character hex string, or `AuditWriteFailed` if the
/// record cannot be serialized.
pub fn hash_event(
    log_id: &str,
    sequence: u64,
    record: &DecisionRecord,
    prev_hash: &str,
) -> GlyeralResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| GlyeralError::AuditWriteFailed {
        reason: format!("decision record is not serializable: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(log_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a hash chain.
///
/// Valid when every event links to its predecessor (or `GENESIS_HASH` for
/// the first) and every stored hash matches the recomputed one. An empty
/// chain is valid.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    first_broken_link(events).is_none()
}

/// Sequence number of the first event that fails verification, if any.
pub fn first_broken_link(events: &[AuditEvent]) -> Option<u64> {
    let mut expected_prev = AuditEvent::GENESIS_HASH;

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return Some(event.sequence);
        }

        match hash_event(&event.log_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return Some(event.sequence),
        }

        expected_prev = event.this_hash.as_str();
    }

    None
}
