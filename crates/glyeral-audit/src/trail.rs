//! Audit trail summaries for the compliance view.
//!
//! Each decision event becomes one `AuditTrailEntry` row: a request id,
//! minute-resolution time, a status badge, a medication summary, the
//! recommendation's confidence, and the physician's action text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use glyeral_contracts::{
    decision::{DecisionAction, DecisionRecord},
    error::GlyeralError,
};

use crate::event::AuditEvent;

/// Status badge shown for a trail row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailStatus {
    Approved,
    Modified,
    Rejected,
}

impl From<DecisionAction> for TrailStatus {
    fn from(action: DecisionAction) -> Self {
        match action {
            DecisionAction::Accepted => TrailStatus::Approved,
            DecisionAction::Modified => TrailStatus::Modified,
            DecisionAction::Rejected => TrailStatus::Rejected,
        }
    }
}

impl fmt::Display for TrailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrailStatus::Approved => "Approved",
            TrailStatus::Modified => "Modified",
            TrailStatus::Rejected => "Rejected",
        })
    }
}

/// One row of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrailEntry {
    /// e.g. "REQ-001".
    pub id: String,
    /// "YYYY-MM-DD HH:MM", UTC.
    pub time: String,
    pub status: TrailStatus,
    pub meds: String,
    pub confidence: u8,
    pub action: String,
}

impl AuditTrailEntry {
    /// Summarize the decision at chain position `sequence`.
    pub fn from_record(sequence: u64, record: &DecisionRecord) -> Self {
        let name = record.drug_id.display_name();
        let original = &record.recommendation.original_dosage;

        let (meds, action) = match (&record.action, &record.modification) {
            (DecisionAction::Modified, Some(m)) => (
                format!("{} {} → {}", name, original, m.modified_dosage),
                m.notes.clone(),
            ),
            (DecisionAction::Rejected, _) => (
                format!("{} {}", name, original),
                record.reason.clone().unwrap_or_else(|| "Rejected".to_string()),
            ),
            _ => (format!("{} {}", name, original), "Accepted".to_string()),
        };

        Self {
            id: format!("REQ-{:03}", sequence + 1),
            time: record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            status: record.action.into(),
            meds,
            confidence: record.recommendation.confidence,
            action,
        }
    }
}

/// Build trail rows for every event, in chain order.
pub fn trail_entries(events: &[AuditEvent]) -> Vec<AuditTrailEntry> {
    events
        .iter()
        .map(|e| AuditTrailEntry::from_record(e.sequence, &e.record))
        .collect()
}

/// Filter chips above the trail table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailFilter {
    #[default]
    All,
    Only(TrailStatus),
}

impl TrailFilter {
    /// Every chip in display order.
    pub const ALL: [TrailFilter; 4] = [
        TrailFilter::All,
        TrailFilter::Only(TrailStatus::Approved),
        TrailFilter::Only(TrailStatus::Modified),
        TrailFilter::Only(TrailStatus::Rejected),
    ];

    pub fn matches(self, entry: &AuditTrailEntry) -> bool {
        match self {
            TrailFilter::All => true,
            TrailFilter::Only(status) => entry.status == status,
        }
    }

    pub fn apply(self, entries: &[AuditTrailEntry]) -> Vec<&AuditTrailEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

impl FromStr for TrailFilter {
    type Err = GlyeralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TrailFilter::All),
            "approved" => Ok(TrailFilter::Only(TrailStatus::Approved)),
            "modified" => Ok(TrailFilter::Only(TrailStatus::Modified)),
            "rejected" => Ok(TrailFilter::Only(TrailStatus::Rejected)),
            other => Err(GlyeralError::Validation {
                reason: format!("unknown audit filter '{}'", other),
            }),
        }
    }
}

impl fmt::Display for TrailFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailFilter::All => f.write_str("All"),
            TrailFilter::Only(status) => status.fmt(f),
        }
    }
}
