//! Scenario 1: Patient Intake
//!
//! A clinician finds a rostered patient, walks the intake pages, and opens
//! the recommendation page. A second, unregistered patient arrives pregnant
//! with no labs entered.
//!
//! Walk-through:
//!   1. Search the roster and select the patient (intake restarts at Demographics)
//!   2. Parse the submitted intake form (text lab values)
//!   3. Evaluate and verify the recommendation list
//!   4. Show the chat quick chips and answer one question
//!   5. Repeat for the pregnant walk-in: labs default, non-insulin drugs block

use tracing::info;

use glyeral_contracts::{
    error::{GlyeralError, GlyeralResult},
    profile::{CkdStage, PatientProfile},
    recommendation::DrugRecommendation,
};
use glyeral_core::{
    traits::{RecommendationEngine, Verifier},
    ClinicianSession, IntakeStep,
};
use glyeral_rules::{ckd_stage, ClinicalContext, GlyeralConfig, TableEngine};
use glyeral_verify::RecommendationVerifier;

use crate::assistant::{quick_chips, respond};
use crate::mock_data::{intake_form, new_patient_form, search_patients};
use crate::scenarios::{parse_intake, print_recommendation};

/// Everything the recommendation page shows for one patient.
#[derive(Debug, Clone)]
pub struct IntakeResult {
    pub profile: PatientProfile,
    pub context: ClinicalContext,
    pub ckd_stage: Option<CkdStage>,
    pub recommendations: Vec<DrugRecommendation>,
}

/// Evaluate an intake form submission with the standard configuration.
///
/// The list is verified before it is returned.
pub fn evaluate_intake(form: serde_json::Value) -> GlyeralResult<IntakeResult> {
    let config = GlyeralConfig::standard()?;
    let engine = TableEngine::from_config(&config);
    let verifier = RecommendationVerifier::with_formulary(config.formulary());

    let profile = parse_intake(form)?;
    let recommendations = engine.evaluate(&profile);
    let report = verifier.verify_recommendations(&recommendations, &engine.candidate_drugs())?;
    if !report.passed {
        return Err(GlyeralError::VerificationFailed {
            reason: report.summary(),
        });
    }

    Ok(IntakeResult {
        context: engine.context_for(&profile),
        ckd_stage: ckd_stage(profile.egfr),
        profile,
        recommendations,
    })
}

fn print_result(result: &IntakeResult) {
    let ctx = &result.context;
    println!(
        "  eGFR:   {:.0} mL/min{}   CKD stage: {}",
        ctx.egfr,
        if ctx.egfr_defaulted { " (default)" } else { "" },
        result
            .ckd_stage
            .map(|s| format!("{} ({})", s.number(), s.label()))
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "  HbA1c:  {:.1}%{}   Pregnant: {}   CKD: {}   CAD: {}",
        ctx.hba1c,
        if ctx.hba1c_defaulted { " (default)" } else { "" },
        ctx.is_pregnant,
        ctx.has_ckd,
        ctx.has_cad
    );
    println!();
    for rec in &result.recommendations {
        print_recommendation(rec);
    }
    println!();
}

/// Run Scenario 1: Patient Intake.
pub fn run_scenario() -> GlyeralResult<()> {
    println!("=== Scenario 1: Patient Intake ===");
    println!();

    let mut session = ClinicianSession::new();

    // ── Rostered patient ─────────────────────────────────────────────────────

    let patient = search_patients("garcia")
        .into_iter()
        .next()
        .ok_or_else(|| GlyeralError::Validation {
            reason: "no roster match for 'garcia'".to_string(),
        })?;
    println!(
        "  Search 'garcia' → {} ({}, {} y/o {}, last visit {})",
        patient.name, patient.mr_number, patient.age, patient.gender, patient.last_visit
    );
    let form = intake_form(&patient.mr_number).ok_or_else(|| GlyeralError::Validation {
        reason: format!("no intake form on file for {}", patient.mr_number),
    })?;
    session.select_patient(patient);

    for step in IntakeStep::ALL
        .into_iter()
        .take_while(|s| *s != IntakeStep::Recommendations)
    {
        session.go_to(step);
        println!("  [intake] {}", step.label());
    }
    session.go_to(IntakeStep::Recommendations);
    println!("  [intake] {}", session.step().label());
    println!();

    let result = evaluate_intake(form)?;
    info!(
        blocked = result.recommendations.iter().filter(|r| r.is_blocked()).count(),
        "intake evaluated"
    );
    print_result(&result);

    println!("  Quick chips:");
    for chip in quick_chips(&result.recommendations) {
        println!("    • {}", chip.label);
    }
    let question = "Why was Farxiga recommended for this patient?";
    let answer = respond(question, &result.recommendations);
    println!();
    println!("  Q: {}", question);
    println!("  A: {}", answer.lines().next().unwrap_or_default());
    println!();

    // ── Pregnant walk-in, no labs ────────────────────────────────────────────

    session.clear_patient();
    println!("  New patient: pregnant, labs not yet entered");
    println!();
    let walk_in = evaluate_intake(new_patient_form())?;
    print_result(&walk_in);

    let blocked = walk_in.recommendations.iter().filter(|r| r.is_blocked()).count();
    println!(
        "  {} of {} drugs blocked; insulin remains available.",
        blocked,
        walk_in.recommendations.len()
    );

    session.logout();
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use glyeral_contracts::{
        profile::CkdStage,
        recommendation::{DrugCategory, RecommendationStatus},
    };

    use super::evaluate_intake;
    use crate::mock_data::{intake_form, new_patient_form};

    #[test]
    fn test_moderate_ckd_patient() {
        let result = evaluate_intake(intake_form("MR-2024-002").unwrap()).unwrap();

        assert_eq!(result.ckd_stage, Some(CkdStage::Moderate));
        let metformin = &result.recommendations[0];
        assert_eq!(metformin.dose_text, "500mg twice daily");
        assert_eq!(metformin.warnings, vec!["Reduce dose for eGFR 30-45"]);
        assert_eq!(result.recommendations[3].confidence, 90, "Farxiga with CKD");
    }

    #[test]
    fn test_blank_egfr_defaults() {
        let result = evaluate_intake(intake_form("MR-2024-005").unwrap()).unwrap();

        assert!(result.context.egfr_defaulted);
        assert!(!result.context.hba1c_defaulted);
        assert_eq!(result.context.egfr, 100.0);
        assert_eq!(result.ckd_stage, None);
    }

    #[test]
    fn test_pregnant_walk_in_blocks_non_insulin() {
        let result = evaluate_intake(new_patient_form()).unwrap();

        for rec in &result.recommendations {
            let expected = if rec.category == DrugCategory::Insulin {
                RecommendationStatus::Approved
            } else {
                RecommendationStatus::Blocked
            };
            assert_eq!(rec.status, expected, "{}", rec.drug_id);
        }
    }

    #[test]
    fn test_non_object_form_is_rejected() {
        let err = evaluate_intake(serde_json::json!("egfr=40")).unwrap_err();
        assert!(err.to_string().contains("intake form"), "got: {err}");
    }
}
