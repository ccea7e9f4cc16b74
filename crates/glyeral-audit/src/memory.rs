//! In-memory implementation of `DecisionRecorder`.
//!
//! `InMemoryDecisionLog` keeps every event in a `Vec` behind a `Mutex`, so a
//! single log can be shared across review sessions via `Arc`. Finalizing a
//! session seals it: later records for that session are refused.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, warn};

use glyeral_contracts::{
    decision::DecisionRecord,
    error::{GlyeralError, GlyeralResult},
};
use glyeral_core::traits::DecisionRecorder;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LogState {
    /// All events, in append order.
    pub(crate) events: Vec<AuditEvent>,

    /// The `this_hash` of the last event, or `GENESIS_HASH` when empty.
    pub(crate) last_hash: String,

    /// Finalized session ids, in finalization order.
    pub(crate) sealed: Vec<String>,
}

// ── Public log ────────────────────────────────────────────────────────────────

/// An append-only decision log backed by a SHA-256 hash chain.
pub struct InMemoryDecisionLog {
    log_id: String,
    pub(crate) state: Arc<Mutex<LogState>>,
}

impl InMemoryDecisionLog {
    pub fn new(log_id: impl Into<String>) -> Self {
        let state = LogState {
            events: Vec::new(),
            last_hash: AuditEvent::GENESIS_HASH.to_string(),
            sealed: Vec::new(),
        };
        Self {
            log_id: log_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn log_id(&self) -> &str {
        &self.log_id
    }

    /// Read access for export and verification. A poisoned lock still holds
    /// a consistent chain because every append is a single push.
    fn read(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> GlyeralResult<MutexGuard<'_, LogState>> {
        self.state.lock().map_err(|e| GlyeralError::AuditWriteFailed {
            reason: format!("decision log lock poisoned: {}", e),
        })
    }

    /// Snapshot every event written so far.
    pub fn export_log(&self) -> AuditLog {
        let state = self.read();
        AuditLog {
            log_id: self.log_id.clone(),
            events: state.events.clone(),
            sealed_sessions: state.sealed.clone(),
            exported_at: Utc::now(),
            terminal_hash: state
                .events
                .last()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        }
    }

    /// Recompute the chain and confirm nothing was altered in memory.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read().events)
    }

    pub fn len(&self) -> usize {
        self.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().events.is_empty()
    }

    /// Every record written for `session_id`, in append order.
    pub fn records_for_session(&self, session_id: &str) -> Vec<DecisionRecord> {
        self.read()
            .events
            .iter()
            .filter(|e| e.record.session_id.0.to_string() == session_id)
            .map(|e| e.record.clone())
            .collect()
    }

    pub fn is_sealed(&self, session_id: &str) -> bool {
        self.read().sealed.iter().any(|s| s == session_id)
    }
}

// ── DecisionRecorder impl ─────────────────────────────────────────────────────

impl DecisionRecorder for InMemoryDecisionLog {
    /// Append one decision to the chain.
    ///
    /// Refused with `AuditWriteFailed` when the record's session has already
    /// been finalized.
    fn record(&self, record: &DecisionRecord) -> GlyeralResult<()> {
        let mut state = self.write()?;

        let session_id = record.session_id.0.to_string();
        if state.sealed.contains(&session_id) {
            warn!(
                session_id = %session_id,
                drug_id = %record.drug_id,
                "write to sealed session refused"
            );
            return Err(GlyeralError::AuditWriteFailed {
                reason: format!("review session '{}' is already finalized", session_id),
            });
        }

        let sequence = state.events.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_event(&self.log_id, sequence, record, &prev_hash)?;

        state.events.push(AuditEvent {
            sequence,
            log_id: self.log_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        Ok(())
    }

    fn finalize(&self, session_id: &str) -> GlyeralResult<()> {
        let mut state = self.write()?;

        if !state.sealed.iter().any(|s| s == session_id) {
            state.sealed.push(session_id.to_string());
        }

        let decision_count = state
            .events
            .iter()
            .filter(|e| e.record.session_id.0.to_string() == session_id)
            .count();
        info!(
            log_id = %self.log_id,
            session_id = %session_id,
            decision_count,
            terminal_hash = %state.last_hash,
            "review session sealed"
        );

        Ok(())
    }
}
