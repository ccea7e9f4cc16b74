//! Scenario 2: Physician Review
//!
//! A physician reviews the generated list for a patient with moderate CKD,
//! then a second session for a pregnant walk-in. Both sessions record into
//! one shared, hash-chained decision log.
//!
//! Walk-through:
//!   1. Generate and verify recommendations
//!   2. Accept Farxiga
//!   3. Try to modify Glargine without notes → refused, nothing recorded
//!   4. Modify Glargine with notes → new modified record, original intact
//!   5. Reject Glimepiride with a reason
//!   6. Pregnant session: accepting Metformin is refused (blocked)
//!   7. Finish both sessions, print the audit trail, verify the chain

use std::sync::Arc;

use glyeral_audit::{trail_entries, InMemoryDecisionLog, TrailFilter, TrailStatus};
use glyeral_contracts::{
    error::{GlyeralError, GlyeralResult},
    recommendation::DrugId,
};
use glyeral_rules::GlyeralConfig;

use crate::mock_data::{intake_form, new_patient_form, sample_audit_trail};
use crate::scenarios::{parse_intake, print_recommendation, review_session};

const PATIENT: &str = "MR-2024-002";

/// Run Scenario 2: Physician Review.
pub fn run_scenario() -> GlyeralResult<()> {
    println!("=== Scenario 2: Physician Review ===");
    println!();

    let config = GlyeralConfig::standard()?;
    let formulary = config.formulary();
    let log = Arc::new(InMemoryDecisionLog::new("clinic-demo"));

    // ── Session 1: moderate CKD ──────────────────────────────────────────────

    let form = intake_form(PATIENT).ok_or_else(|| GlyeralError::Validation {
        reason: format!("no intake form on file for {}", PATIENT),
    })?;
    let profile = parse_intake(form)?;

    let mut session = review_session(PATIENT, &config, &log);
    println!("  Patient {}  session {}", PATIENT, session.session_id().0);
    for rec in session.generate(&profile)? {
        print_recommendation(rec);
    }
    println!();

    let farxiga = DrugId::from("Farxiga");
    session.accept(&farxiga)?;
    println!("  ACCEPT  {}", farxiga.label());

    let glargine = DrugId::from("Glargine_Before_Dinner");
    let original = session
        .recommendations()
        .iter()
        .find(|r| r.drug_id == glargine)
        .cloned()
        .ok_or_else(|| GlyeralError::RecommendationNotFound {
            drug_id: glargine.to_string(),
        })?;

    let mut request = formulary.draft_modification(&original);
    request.dosage = "8 units".to_string();
    match session.modify(&glargine, request.clone()) {
        Err(GlyeralError::Validation { reason }) => {
            println!("  MODIFY  {} without notes → refused: {}", glargine.label(), reason);
        }
        Err(e) => return Err(e),
        Ok(_) => println!("  MODIFY  {} without notes → unexpectedly accepted", glargine.label()),
    }

    request.notes = "Fasting glucose at target; reduce basal dose".to_string();
    let modified = session.modify(&glargine, request)?;
    println!(
        "  MODIFY  {} {} → {} ({})",
        glargine.label(),
        modified.original.dose_text,
        modified.dose_text,
        modified.notes
    );

    let glimepiride = DrugId::from("Glimepiride");
    session.reject(&glimepiride, Some("Hypoglycemia history".to_string()))?;
    println!("  REJECT  {}", glimepiride.label());
    println!(
        "  Pending: {} of {} recommendations",
        session.pending().count(),
        session.recommendations().len()
    );
    session.finish()?;
    println!();

    // ── Session 2: pregnant walk-in ──────────────────────────────────────────

    let mut walk_in = review_session("WALK-IN", &config, &log);
    walk_in.generate(&parse_intake(new_patient_form())?)?;

    let metformin = DrugId::from("Metformin");
    match walk_in.accept(&metformin) {
        Err(GlyeralError::RecommendationBlocked { reason, .. }) => {
            println!("  ACCEPT  {} (pregnant) → refused: {}", metformin.label(), reason);
        }
        Err(e) => return Err(e),
        Ok(_) => println!("  ACCEPT  {} (pregnant) → unexpectedly accepted", metformin.label()),
    }
    walk_in.accept(&DrugId::from("Glargine_Before_Dinner"))?;
    println!("  ACCEPT  Glargine (Before Dinner) (pregnant)");
    walk_in.finish()?;
    println!();

    // ── Audit trail ──────────────────────────────────────────────────────────

    let exported = log.export_log();
    let mut rows = sample_audit_trail();
    let recorded = trail_entries(&exported.events);
    println!("  Audit trail ({} historical, {} new):", rows.len(), recorded.len());
    rows.extend(recorded);
    for row in &rows {
        println!(
            "    {}  {}  {:<9} {:<40} {:>3}%  {}",
            row.id, row.time, row.status, row.meds, row.confidence, row.action
        );
    }
    let approved = TrailFilter::Only(TrailStatus::Approved).apply(&rows).len();
    println!("  Filter 'Approved': {} row(s)", approved);
    println!();

    println!(
        "  Audit chain integrity:  {} ({} event(s), {} sealed session(s))",
        if log.verify_integrity() { "VERIFIED" } else { "FAILED" },
        exported.events.len(),
        exported.sealed_sessions.len()
    );
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
