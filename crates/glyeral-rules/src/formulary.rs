//! Formulary lookup for the modification workflow.
//!
//! Lookups never fail: an unknown drug id yields a generic `"N/A"` view so
//! the physician-facing flow keeps working on a data-shape mismatch.

use glyeral_contracts::{
    decision::ModificationRequest,
    formulary::{FormularyEntry, FormularyView},
    recommendation::{DrugId, DrugRecommendation},
};

/// Frequency offered when the formulary has no entry for a drug.
pub const FALLBACK_FREQUENCY: &str = "Once daily";
/// Timing offered when the formulary has no entry for a drug.
pub const FALLBACK_TIMING: &str = "Morning";
/// Dosage option offered when the formulary has no entry for a drug.
pub const FALLBACK_DOSAGE_OPTION: &str = "Custom";

/// Per-drug dosing options, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Formulary {
    entries: Vec<FormularyEntry>,
}

impl Formulary {
    pub fn new(entries: Vec<FormularyEntry>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, drug_id: &DrugId) -> Option<&FormularyEntry> {
        self.entries.iter().find(|e| &e.drug_id == drug_id)
    }

    pub fn entries(&self) -> &[FormularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The display view for `drug_id`, with `"N/A"` placeholders when unknown.
    pub fn view(&self, drug_id: &DrugId) -> FormularyView {
        match self.lookup(drug_id) {
            Some(entry) => FormularyView {
                drug_id: entry.drug_id.clone(),
                drug_class: entry.drug_class.clone(),
                dosage_range: entry.dosage_range.clone(),
                dosage_options: entry.dosage_options.clone(),
                frequency_options: entry.frequency_options.clone(),
                timing_options: entry.timing_options.clone(),
                known: true,
            },
            None => FormularyView {
                drug_id: drug_id.clone(),
                drug_class: FormularyView::NOT_AVAILABLE.to_string(),
                dosage_range: FormularyView::NOT_AVAILABLE.to_string(),
                dosage_options: vec![FALLBACK_DOSAGE_OPTION.to_string()],
                frequency_options: vec![FALLBACK_FREQUENCY.to_string()],
                timing_options: vec![FALLBACK_TIMING.to_string()],
                known: false,
            },
        }
    }

    /// Pre-fill a modification form for `recommendation`.
    ///
    /// Dosage starts at the recommendation's original dosage, frequency and
    /// timing at the first formulary option. Notes start empty and must be
    /// filled in before the request will be accepted.
    pub fn draft_modification(&self, recommendation: &DrugRecommendation) -> ModificationRequest {
        let view = self.view(&recommendation.drug_id);
        ModificationRequest {
            dosage: recommendation.original_dosage.clone(),
            frequency: first_or(&view.frequency_options, FALLBACK_FREQUENCY),
            timing: first_or(&view.timing_options, FALLBACK_TIMING),
            notes: String::new(),
        }
    }

    /// Fill the frequency and timing a physician left blank with the first
    /// formulary option, as `draft_modification` would have pre-selected.
    /// Every field comes back trimmed.
    pub fn complete_modification(
        &self,
        drug_id: &DrugId,
        request: ModificationRequest,
    ) -> ModificationRequest {
        let view = self.view(drug_id);
        ModificationRequest {
            dosage: request.dosage.trim().to_string(),
            frequency: trimmed_or_first(
                &request.frequency,
                &view.frequency_options,
                FALLBACK_FREQUENCY,
            ),
            timing: trimmed_or_first(&request.timing, &view.timing_options, FALLBACK_TIMING),
            notes: request.notes.trim().to_string(),
        }
    }
}

fn trimmed_or_first(value: &str, options: &[String], fallback: &str) -> String {
    match value.trim() {
        "" => first_or(options, fallback),
        v => v.to_string(),
    }
}

fn first_or(options: &[String], fallback: &str) -> String {
    options
        .first()
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}
