//! Resolved clinical inputs for rule evaluation.
//!
//! Rules never see a raw `PatientProfile`. The engine first resolves it into a
//! `ClinicalContext` with every lab present (defaulted where missing) and CKD
//! derived from eGFR.

use glyeral_contracts::profile::{CkdStage, PatientProfile};

use crate::config::LabDefaults;

/// eGFR below this value implies chronic kidney disease.
pub const CKD_EGFR_THRESHOLD: f64 = 60.0;

/// The fully resolved inputs every rule function receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalContext {
    pub egfr: f64,
    pub hba1c: f64,
    pub is_pregnant: bool,
    /// Explicit CKD flag OR `egfr < 60`.
    pub has_ckd: bool,
    pub has_cad: bool,
    /// True when `egfr` came from the lab defaults.
    pub egfr_defaulted: bool,
    /// True when `hba1c` came from the lab defaults.
    pub hba1c_defaulted: bool,
}

impl ClinicalContext {
    pub fn resolve(profile: &PatientProfile, defaults: &LabDefaults) -> Self {
        let egfr = PatientProfile::sanitize_lab(profile.egfr);
        let hba1c = PatientProfile::sanitize_lab(profile.hba1c);
        let resolved_egfr = egfr.unwrap_or(defaults.egfr);

        Self {
            egfr: resolved_egfr,
            hba1c: hba1c.unwrap_or(defaults.hba1c),
            is_pregnant: profile.is_pregnant,
            has_ckd: profile.has_ckd || resolved_egfr < CKD_EGFR_THRESHOLD,
            has_cad: profile.has_cad,
            egfr_defaulted: egfr.is_none(),
            hba1c_defaulted: hba1c.is_none(),
        }
    }
}

/// KDIGO stage for a measured eGFR. Absent or unreadable eGFR has no stage.
pub fn ckd_stage(egfr: Option<f64>) -> Option<CkdStage> {
    let v = PatientProfile::sanitize_lab(egfr)?;
    Some(if v >= 90.0 {
        CkdStage::Normal
    } else if v >= 60.0 {
        CkdStage::Mild
    } else if v >= 30.0 {
        CkdStage::Moderate
    } else if v >= 15.0 {
        CkdStage::Severe
    } else {
        CkdStage::Failure
    })
}
