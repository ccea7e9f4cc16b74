//! Recommendation verifier for the GLYERAL runtime.
//!
//! `RecommendationVerifier` implements the `Verifier` trait from
//! `glyeral-core`. A recommendation list is verified in two phases:
//!
//! 1. **Structural**: the serialized list is validated against the
//!    recommendation-list JSON Schema using the `jsonschema` crate.
//! 2. **Semantic**: coverage of the candidate drugs and the placement of
//!    `BLOCKED:` warnings are checked per recommendation.
//!
//! All failures are collected before returning so the caller sees the full
//! failure set in one report.
//!
//! Modification requests are checked against the formulary, when one is
//! configured, and against the recommendation they modify.

use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, warn};

use glyeral_contracts::{
    decision::ModificationRequest,
    error::{GlyeralError, GlyeralResult},
    recommendation::{DrugId, DrugRecommendation},
    verify::{VerificationFailure, VerificationReport},
};
use glyeral_core::traits::Verifier;
use glyeral_rules::formulary::Formulary;

/// Check identifiers reported in `VerificationFailure::check_id`.
pub mod checks {
    pub const JSON_SCHEMA: &str = "json-schema";
    pub const COVERAGE: &str = "coverage";
    pub const BLOCKED_WARNING_FIRST: &str = "blocked-warning-first";
    pub const SINGLE_BLOCK_WARNING: &str = "single-block-warning";
    pub const BLOCK_STATUS_CONSISTENT: &str = "block-status-consistent";
    pub const NOTES_REQUIRED: &str = "notes-required";
    pub const DOSAGE_REQUIRED: &str = "dosage-required";
    pub const FREQUENCY_REQUIRED: &str = "frequency-required";
    pub const TIMING_REQUIRED: &str = "timing-required";
    pub const NOT_BLOCKED: &str = "not-blocked";
    pub const FORMULARY_OPTION: &str = "formulary-option";
}

/// JSON Schema for the serialized `Vec<DrugRecommendation>`.
pub fn recommendation_list_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": [
                "drugId", "doseText", "originalDosage", "confidence",
                "status", "guidelines", "warnings", "category"
            ],
            "properties": {
                "drugId": { "type": "string", "minLength": 1 },
                "doseText": { "type": "string", "minLength": 1 },
                "originalDosage": { "type": "string" },
                "confidence": { "type": "integer", "minimum": 0, "maximum": 100 },
                "status": { "enum": ["approved", "warning", "blocked"] },
                "guidelines": { "type": "array", "items": { "type": "string" } },
                "warnings": { "type": "array", "items": { "type": "string" } },
                "category": { "enum": ["Oral", "Injectable", "Insulin"] }
            }
        }
    })
}

/// The GLYERAL verifier.
///
/// Without a formulary, modification requests are checked only for notes,
/// dosage, and block status.
#[derive(Debug, Clone, Default)]
pub struct RecommendationVerifier {
    formulary: Option<Formulary>,
}

impl RecommendationVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A verifier that also checks modification requests against `formulary`.
    pub fn with_formulary(formulary: Formulary) -> Self {
        Self {
            formulary: Some(formulary),
        }
    }

    fn structural_failures(
        &self,
        recommendations: &[DrugRecommendation],
    ) -> GlyeralResult<Vec<VerificationFailure>> {
        let payload =
            serde_json::to_value(recommendations).map_err(|e| GlyeralError::SchemaValidation {
                reason: format!("failed to serialize recommendations: {e}"),
            })?;
        let schema = recommendation_list_schema();
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| GlyeralError::SchemaValidation {
                reason: format!("invalid JSON Schema document: {e}"),
            })?;

        Ok(validator
            .iter_errors(&payload)
            .map(|error| {
                VerificationFailure::new(
                    checks::JSON_SCHEMA,
                    format!("JSON Schema violation at {}: {}", error.instance_path, error),
                )
            })
            .collect())
    }
}

/// Every expected drug appears exactly once and nothing else appears.
fn coverage_failures(
    recommendations: &[DrugRecommendation],
    expected: &[DrugId],
) -> Vec<VerificationFailure> {
    let mut counts: HashMap<&DrugId, usize> = HashMap::new();
    for rec in recommendations {
        *counts.entry(&rec.drug_id).or_default() += 1;
    }

    let mut failures = Vec::new();
    for id in expected {
        match counts.remove(id) {
            Some(1) => {}
            Some(n) => failures.push(VerificationFailure::new(
                checks::COVERAGE,
                format!("drug '{id}' appears {n} times"),
            )),
            None => failures.push(VerificationFailure::new(
                checks::COVERAGE,
                format!("missing recommendation for drug '{id}'"),
            )),
        }
    }

    let mut unexpected: Vec<&DrugId> = counts.into_keys().collect();
    unexpected.sort();
    for id in unexpected {
        failures.push(VerificationFailure::new(
            checks::COVERAGE,
            format!("unexpected recommendation for drug '{id}'"),
        ));
    }
    failures
}

/// Placement and consistency of `BLOCKED:` warnings for one recommendation.
fn block_warning_failures(rec: &DrugRecommendation) -> Vec<VerificationFailure> {
    let mut failures = Vec::new();
    let positions: Vec<usize> = rec
        .warnings
        .iter()
        .enumerate()
        .filter(|(_, w)| w.starts_with(DrugRecommendation::BLOCKED_PREFIX))
        .map(|(i, _)| i)
        .collect();

    if positions.len() > 1 {
        failures.push(VerificationFailure::new(
            checks::SINGLE_BLOCK_WARNING,
            format!("'{}' carries {} block warnings", rec.drug_id, positions.len()),
        ));
    }
    if positions.iter().any(|&i| i != 0) {
        failures.push(VerificationFailure::new(
            checks::BLOCKED_WARNING_FIRST,
            format!("'{}' has a block warning after index 0", rec.drug_id),
        ));
    }
    if rec.is_blocked() != !positions.is_empty() {
        failures.push(VerificationFailure::new(
            checks::BLOCK_STATUS_CONSISTENT,
            format!(
                "'{}' has status '{}' but {} block warning(s)",
                rec.drug_id,
                rec.status.as_str(),
                positions.len()
            ),
        ));
    }
    failures
}

impl Verifier for RecommendationVerifier {
    fn verify_recommendations(
        &self,
        recommendations: &[DrugRecommendation],
        expected: &[DrugId],
    ) -> GlyeralResult<VerificationReport> {
        // ── Phase 1: JSON Schema structural validation ────────────────────────
        let mut failures = self.structural_failures(recommendations)?;

        // ── Phase 2: semantic checks ──────────────────────────────────────────
        debug!(check_id = checks::COVERAGE, expected = expected.len(), "evaluating check");
        failures.extend(coverage_failures(recommendations, expected));

        for rec in recommendations {
            debug!(drug_id = %rec.drug_id, "evaluating block warning checks");
            failures.extend(block_warning_failures(rec));
        }

        for failure in &failures {
            warn!(
                check_id = %failure.check_id,
                message = %failure.message,
                "verification check failed"
            );
        }
        let report = VerificationReport::from_failures(failures);
        debug!(
            passed = report.passed,
            failure_count = report.failures.len(),
            "recommendation verification complete"
        );
        Ok(report)
    }

    /// Blank frequency and timing take the first formulary option, or the
    /// generic fallbacks when no formulary is configured.
    fn complete_modification(
        &self,
        recommendation: &DrugRecommendation,
        request: ModificationRequest,
    ) -> ModificationRequest {
        match &self.formulary {
            Some(formulary) => formulary.complete_modification(&recommendation.drug_id, request),
            None => Formulary::default().complete_modification(&recommendation.drug_id, request),
        }
    }

    fn verify_modification(
        &self,
        recommendation: &DrugRecommendation,
        request: &ModificationRequest,
    ) -> GlyeralResult<VerificationReport> {
        let mut failures = Vec::new();

        if request.notes.trim().is_empty() {
            failures.push(VerificationFailure::new(
                checks::NOTES_REQUIRED,
                "a justification note is required for every modification",
            ));
        }
        for (check_id, field, value) in [
            (checks::DOSAGE_REQUIRED, "dosage", &request.dosage),
            (checks::FREQUENCY_REQUIRED, "frequency", &request.frequency),
            (checks::TIMING_REQUIRED, "timing", &request.timing),
        ] {
            if value.trim().is_empty() {
                failures.push(VerificationFailure::new(
                    check_id,
                    format!("a {field} must be selected"),
                ));
            }
        }
        if recommendation.is_blocked() {
            failures.push(VerificationFailure::new(
                checks::NOT_BLOCKED,
                format!("'{}' is blocked and cannot be prescribed", recommendation.drug_id),
            ));
        }

        if let Some(entry) = self
            .formulary
            .as_ref()
            .and_then(|f| f.lookup(&recommendation.drug_id))
        {
            let fields = [
                ("dosage", &request.dosage, &entry.dosage_options),
                ("frequency", &request.frequency, &entry.frequency_options),
                ("timing", &request.timing, &entry.timing_options),
            ];
            for (field, value, options) in fields {
                let value = value.trim();
                if !value.is_empty() && !options.iter().any(|o| o == value) {
                    failures.push(VerificationFailure::new(
                        checks::FORMULARY_OPTION,
                        format!(
                            "{field} '{value}' is not a formulary option for '{}'",
                            recommendation.drug_id
                        ),
                    ));
                }
            }
        }

        for failure in &failures {
            warn!(
                drug_id = %recommendation.drug_id,
                check_id = %failure.check_id,
                message = %failure.message,
                "modification check failed"
            );
        }
        Ok(VerificationReport::from_failures(failures))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
