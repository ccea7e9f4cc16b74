//! Session-scoped clinician UI state.
//!
//! One `ClinicianSession` exists per signed-in clinician. Views that need the
//! selected patient or the current intake step receive it by reference;
//! nothing here is global. `logout()` returns the session to its initial
//! state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use glyeral_contracts::profile::PatientSummary;

/// The intake and review pages, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStep {
    Demographics,
    Conditions,
    Labs,
    Glucose,
    Medications,
    Recommendations,
    Audit,
}

impl IntakeStep {
    /// Every step in sidebar order.
    pub const ALL: [IntakeStep; 7] = [
        IntakeStep::Demographics,
        IntakeStep::Conditions,
        IntakeStep::Labs,
        IntakeStep::Glucose,
        IntakeStep::Medications,
        IntakeStep::Recommendations,
        IntakeStep::Audit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IntakeStep::Demographics => "Demographics",
            IntakeStep::Conditions => "Health Issues",
            IntakeStep::Labs => "Lab Values",
            IntakeStep::Glucose => "Blood Sugar",
            IntakeStep::Medications => "Medications",
            IntakeStep::Recommendations => "AI Recommendations",
            IntakeStep::Audit => "Audit Trail",
        }
    }
}

/// Mutable UI state for one clinician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicianSession {
    selected_patient: Option<PatientSummary>,
    sidebar_open: bool,
    step: IntakeStep,
}

impl Default for ClinicianSession {
    fn default() -> Self {
        Self {
            selected_patient: None,
            sidebar_open: true,
            step: IntakeStep::Demographics,
        }
    }
}

impl ClinicianSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_patient(&self) -> Option<&PatientSummary> {
        self.selected_patient.as_ref()
    }

    /// Select a patient and restart intake at the first step.
    pub fn select_patient(&mut self, patient: PatientSummary) {
        debug!(mr_number = %patient.mr_number, "patient selected");
        self.selected_patient = Some(patient);
        self.step = IntakeStep::Demographics;
    }

    pub fn clear_patient(&mut self) {
        self.selected_patient = None;
        self.step = IntakeStep::Demographics;
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    pub fn go_to(&mut self, step: IntakeStep) {
        self.step = step;
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Drop all session state.
    pub fn logout(&mut self) {
        debug!("clinician session reset on logout");
        *self = Self::default();
    }
}
