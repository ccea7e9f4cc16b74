//! Clinic reference scenarios.
//!
//! Each scenario wires the real GLYERAL components (table engine,
//! recommendation verifier, hash-chained decision log) to the mock clinic
//! data and prints what a physician would see.

use std::sync::Arc;

use serde_json::Value;

use glyeral_audit::InMemoryDecisionLog;
use glyeral_contracts::{
    decision::DecisionRecord,
    error::{GlyeralError, GlyeralResult},
    profile::PatientProfile,
    recommendation::DrugRecommendation,
};
use glyeral_core::{traits::DecisionRecorder, ReviewSession};
use glyeral_rules::{GlyeralConfig, TableEngine};
use glyeral_verify::RecommendationVerifier;

pub mod intake;
pub mod review;

/// Lets an `Arc<InMemoryDecisionLog>` be handed to a `ReviewSession` as
/// `Box<dyn DecisionRecorder>` while the scenario keeps a handle for export.
pub(crate) struct ArcLog(pub(crate) Arc<InMemoryDecisionLog>);

impl DecisionRecorder for ArcLog {
    fn record(&self, record: &DecisionRecord) -> GlyeralResult<()> {
        self.0.record(record)
    }

    fn finalize(&self, session_id: &str) -> GlyeralResult<()> {
        self.0.finalize(session_id)
    }
}

/// Build a review session for `patient_id` from `config`, recording into `log`.
pub fn review_session(
    patient_id: &str,
    config: &GlyeralConfig,
    log: &Arc<InMemoryDecisionLog>,
) -> ReviewSession {
    ReviewSession::new(
        patient_id,
        Box::new(TableEngine::from_config(config)),
        Box::new(RecommendationVerifier::with_formulary(config.formulary())),
        Box::new(ArcLog(Arc::clone(log))),
    )
}

/// Deserialize an intake form submission into a profile.
pub fn parse_intake(form: Value) -> GlyeralResult<PatientProfile> {
    serde_json::from_value(form).map_err(|e| GlyeralError::Validation {
        reason: format!("intake form is not a patient profile: {}", e),
    })
}

/// Print one recommendation as a card row.
pub(crate) fn print_recommendation(rec: &DrugRecommendation) {
    println!(
        "  {:<30} {:<34} {:>3}%  {}",
        rec.drug_id.label(),
        rec.dose_text,
        rec.confidence,
        rec.status.as_str().to_uppercase()
    );
    for warning in &rec.warnings {
        println!("  {:<30} ! {}", "", warning);
    }
}
