//! Recommendation output types.
//!
//! The engine produces one `DrugRecommendation` per drug in its table, in
//! table order. These values are ephemeral: they live for one evaluation and
//! are never mutated once shown to a physician.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a candidate drug slot.
///
/// Stable across evaluations for the same patient, so a decision recorder can
/// correlate physician actions with regenerated recommendations.
/// Example: DrugId("Glargine_Before_Dinner")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrugId(pub String);

impl DrugId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The drug name without its meal-slot suffix:
    /// "Lispro_Before_Lunch" → "Lispro".
    pub fn display_name(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// Card title: "Glargine_Before_Dinner" → "Glargine (Before Dinner)".
    pub fn label(&self) -> String {
        match self.0.split_once('_') {
            Some((name, slot)) => format!("{} ({})", name, slot.replace('_', " ")),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for DrugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrugId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Approval status of a single recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    Approved,
    /// Prescribable, but the drug class carries a notable risk.
    Warning,
    /// A hard contraindication fired. The dose text is informational only.
    Blocked,
}

impl RecommendationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationStatus::Approved => "approved",
            RecommendationStatus::Warning => "warning",
            RecommendationStatus::Blocked => "blocked",
        }
    }
}

/// Route/class grouping used for display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrugCategory {
    Oral,
    Injectable,
    Insulin,
}

/// One evaluated drug: dose, confidence, status, and supporting text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecommendation {
    pub drug_id: DrugId,

    /// Human-readable prescribed dose and frequency.
    pub dose_text: String,

    /// Canonical starting dose before any physician modification.
    pub original_dosage: String,

    /// Heuristic appropriateness score, 0 to 100. Not a probability.
    pub confidence: u8,

    pub status: RecommendationStatus,

    /// Guideline citation tags, in display order.
    pub guidelines: Vec<String>,

    /// Ordered most to least severe. A `"BLOCKED: …"` entry, when present,
    /// is always at index 0.
    pub warnings: Vec<String>,

    pub category: DrugCategory,
}

impl DrugRecommendation {
    /// Prefix carried by the single warning that explains a hard block.
    pub const BLOCKED_PREFIX: &'static str = "BLOCKED:";

    pub fn is_blocked(&self) -> bool {
        self.status == RecommendationStatus::Blocked
    }

    /// The block explanation, if this recommendation is blocked.
    pub fn block_reason(&self) -> Option<&str> {
        self.warnings
            .first()
            .map(String::as_str)
            .filter(|w| w.starts_with(Self::BLOCKED_PREFIX))
    }
}
