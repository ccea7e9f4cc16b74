//! Audit event and log types.
//!
//! `AuditEvent` wraps one `DecisionRecord` with its chain position and the
//! SHA-256 hashes that make tampering detectable. `AuditLog` is the exported
//! snapshot of a whole decision log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glyeral_contracts::decision::DecisionRecord;

/// A single entry in the decision hash chain.
///
/// Changing any field, including those of the embedded record, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The decision log this event belongs to.
    pub log_id: String,

    pub record: DecisionRecord,

    /// Hash of the previous event, or `GENESIS_HASH` for the first event.
    pub prev_hash: String,

    /// Hash over (log_id, sequence, prev_hash, record JSON).
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// An exported snapshot of a decision log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub log_id: String,

    /// All events in chain order.
    pub events: Vec<AuditEvent>,

    /// Review sessions that have been finalized, in finalization order.
    pub sealed_sessions: Vec<String>,

    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last event. Empty if the log is empty.
    pub terminal_hash: String,
}
