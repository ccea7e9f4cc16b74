//! Physician decision types.
//!
//! A physician accepts, modifies, or rejects each recommendation. The
//! original `DrugRecommendation` is never touched: a modification produces a
//! separate `ModifiedRecommendation`, and every action is captured as a
//! `DecisionRecord` for the audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommendation::{DrugId, DrugRecommendation};

/// Unique identifier for one physician review session.
///
/// A session spans one generated recommendation list and every decision
/// taken against it. It appears in every decision record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// What the physician did with a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    Accepted,
    Modified,
    Rejected,
}

impl DecisionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionAction::Accepted => "accepted",
            DecisionAction::Modified => "modified",
            DecisionAction::Rejected => "rejected",
        }
    }
}

/// A physician's requested change to a recommended dose.
///
/// `notes` is the mandatory justification required for audit compliance.
/// An empty or whitespace-only `notes` is refused before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationRequest {
    /// Selected dosage, e.g. "500mg" or "12 units".
    pub dosage: String,
    /// e.g. "Twice daily".
    pub frequency: String,
    /// e.g. "With dinner".
    pub timing: String,
    pub notes: String,
}

/// The new record produced by a successful modification.
///
/// Carries the untouched original alongside the physician's changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedRecommendation {
    /// The recommendation exactly as the engine produced it.
    pub original: DrugRecommendation,
    /// `"<dosage> <frequency lowercased>"`.
    pub dose_text: String,
    pub modified_dosage: String,
    pub frequency: String,
    pub timing: String,
    pub notes: String,
    /// Always `DecisionAction::Modified`; serialized as `"modified"`.
    pub status: DecisionAction,
    pub modified_at: DateTime<Utc>,
}

/// An immutable record of one physician action, written to the decision log.
///
/// Every successful accept, modify, or reject produces exactly one record.
/// Records are appended and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub decision_id: uuid::Uuid,
    pub session_id: SessionId,
    pub patient_id: String,
    pub drug_id: DrugId,
    pub action: DecisionAction,
    /// Snapshot of the recommendation the physician acted on.
    pub recommendation: DrugRecommendation,
    /// Present only when `action` is `Modified`.
    pub modification: Option<ModifiedRecommendation>,
    /// Free-text reason supplied with a rejection.
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}
