//! Simulated clinic data for the GLYERAL reference runtime.
//!
//! All data in this module is hardcoded and fictional. It stands in for the
//! patient registry, the lab system, and the historical audit trail.

use serde_json::{json, Value};

use glyeral_audit::{AuditTrailEntry, TrailStatus};
use glyeral_contracts::profile::PatientSummary;

// ── Patient roster (mock) ─────────────────────────────────────────────────────

/// The dashboard roster, in registry order.
pub fn patients() -> Vec<PatientSummary> {
    [
        ("MR-2024-001", "John Smith", 58, "Male", "2024-12-15", 8.2),
        ("MR-2024-002", "Maria Garcia", 62, "Female", "2024-12-18", 7.5),
        ("MR-2024-003", "Robert Johnson", 45, "Male", "2024-12-19", 9.1),
        ("MR-2024-004", "Sarah Chen", 51, "Female", "2024-12-10", 6.8),
        ("MR-2024-005", "James Wilson", 67, "Male", "2024-12-12", 7.9),
    ]
    .into_iter()
    .map(|(mr, name, age, gender, last_visit, hba1c)| PatientSummary {
        mr_number: mr.to_string(),
        name: name.to_string(),
        age,
        gender: gender.to_string(),
        last_visit: last_visit.to_string(),
        hba1c: Some(hba1c),
    })
    .collect()
}

pub fn find_patient(mr_number: &str) -> Option<PatientSummary> {
    patients().into_iter().find(|p| p.mr_number == mr_number)
}

/// Case-insensitive substring search over name and MR number. A blank query
/// returns the whole roster.
pub fn search_patients(query: &str) -> Vec<PatientSummary> {
    let q = query.trim().to_lowercase();
    patients()
        .into_iter()
        .filter(|p| {
            q.is_empty()
                || p.name.to_lowercase().contains(&q)
                || p.mr_number.to_lowercase().contains(&q)
        })
        .collect()
}

// ── Intake forms (mock) ───────────────────────────────────────────────────────

/// The intake payload for a rostered patient, as the form submits it.
///
/// Lab fields are text, exactly as typed. A blank field means the lab was not
/// entered.
///
/// | MR number   | eGFR | HbA1c | Conditions |
/// |-------------|------|-------|------------|
/// | MR-2024-001 | 72   | 8.2   | CAD        |
/// | MR-2024-002 | 38   | 7.5   | CKD        |
/// | MR-2024-003 | 95   | 9.1   |            |
/// | MR-2024-004 | 22   | 6.8   | CKD        |
/// | MR-2024-005 |      | 7.9   | CAD        |
pub fn intake_form(mr_number: &str) -> Option<Value> {
    let form = match mr_number {
        "MR-2024-001" => json!({
            "egfr": "72", "hba1c": "8.2",
            "isPregnant": false, "hasCKD": false, "hasCAD": true
        }),
        "MR-2024-002" => json!({
            "egfr": "38", "hba1c": "7.5",
            "isPregnant": false, "hasCKD": true, "hasCAD": false
        }),
        "MR-2024-003" => json!({
            "egfr": "95", "hba1c": "9.1",
            "isPregnant": false, "hasCKD": false, "hasCAD": false
        }),
        "MR-2024-004" => json!({
            "egfr": "22", "hba1c": "6.8",
            "isPregnant": false, "hasCKD": true, "hasCAD": false
        }),
        "MR-2024-005" => json!({
            "egfr": "", "hba1c": "7.9",
            "isPregnant": false, "hasCKD": false, "hasCAD": true
        }),
        _ => return None,
    };
    Some(form)
}

/// A new, unregistered patient: pregnant, labs not yet back.
pub fn new_patient_form() -> Value {
    json!({
        "egfr": "",
        "hba1c": "",
        "isPregnant": true,
        "hasCKD": false,
        "hasCAD": false
    })
}

// ── Historical audit trail (mock) ─────────────────────────────────────────────

/// Decisions recorded before this runtime was deployed.
pub fn sample_audit_trail() -> Vec<AuditTrailEntry> {
    [
        (
            "REQ-001",
            "2024-12-19 14:32",
            TrailStatus::Approved,
            "Metformin 1000mg, Semaglutide 0.5mg",
            91,
            "Accepted - Dr. Smith",
        ),
        (
            "REQ-002",
            "2024-12-18 09:15",
            TrailStatus::Modified,
            "Glargine 15u → 10u",
            85,
            "Reduced - patient preference",
        ),
        (
            "REQ-003",
            "2024-12-17 16:45",
            TrailStatus::Rejected,
            "Glimepiride 4mg",
            52,
            "Hypoglycemia history",
        ),
        (
            "REQ-004",
            "2024-12-16 11:20",
            TrailStatus::Approved,
            "Farxiga 10mg, Tradjenta 5mg",
            87,
            "Accepted - Dr. Lee",
        ),
    ]
    .into_iter()
    .map(|(id, time, status, meds, confidence, action)| AuditTrailEntry {
        id: id.to_string(),
        time: time.to_string(),
        status,
        meds: meds.to_string(),
        confidence,
        action: action.to_string(),
    })
    .collect()
}
