//! Formulary types: per-drug dosing options shown in the modification flow.

use serde::{Deserialize, Serialize};

use crate::recommendation::DrugId;

/// Dosing options for one drug slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormularyEntry {
    pub drug_id: DrugId,
    /// Pharmacological class, e.g. "SGLT2 Inhibitor".
    pub drug_class: String,
    /// Display range, e.g. "500-2000mg".
    pub dosage_range: String,
    pub dosage_options: Vec<String>,
    pub frequency_options: Vec<String>,
    pub timing_options: Vec<String>,
    /// "mg" or "units".
    pub unit: String,
}

/// What the UI shows for a drug in the modification dialog.
///
/// Unknown drugs render as `"N/A"` rather than failing mid-workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormularyView {
    pub drug_id: DrugId,
    pub drug_class: String,
    pub dosage_range: String,
    pub dosage_options: Vec<String>,
    pub frequency_options: Vec<String>,
    pub timing_options: Vec<String>,
    /// False when the view was synthesized for an unknown drug.
    pub known: bool,
}

impl FormularyView {
    /// Placeholder shown for any field the formulary cannot supply.
    pub const NOT_AVAILABLE: &'static str = "N/A";
}
