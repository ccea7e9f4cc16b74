//! Table-driven recommendation engine.
//!
//! `TableEngine` resolves a `PatientProfile` into a `ClinicalContext` once,
//! then applies every `DrugRule` in table order. It implements the
//! `RecommendationEngine` trait from glyeral-core.
//!
//! Evaluation algorithm:
//!
//! 1. Substitute lab defaults for absent or unreadable eGFR and HbA1c.
//! 2. Derive CKD from the explicit flag or `egfr < 60`.
//! 3. For each row: compute the dose and block reason, then assemble warnings
//!    as block reason, dose caveat, class warnings.

use tracing::{debug, info};

use glyeral_contracts::{
    profile::PatientProfile,
    recommendation::{DrugId, DrugRecommendation},
};
use glyeral_core::traits::RecommendationEngine;

use crate::config::{GlyeralConfig, LabDefaults};
use crate::context::ClinicalContext;
use crate::rule::DrugRule;
use crate::table::standard_table;

/// A `RecommendationEngine` over a fixed rule table.
///
/// ```rust,ignore
/// use glyeral_rules::engine::TableEngine;
///
/// let engine = TableEngine::standard();
/// let recs = engine.evaluate(&profile);
/// ```
#[derive(Debug, Clone)]
pub struct TableEngine {
    rules: Vec<DrugRule>,
    defaults: LabDefaults,
}

impl TableEngine {
    pub fn new(rules: Vec<DrugRule>, defaults: LabDefaults) -> Self {
        Self { rules, defaults }
    }

    /// The standard twelve-slot table with built-in lab defaults.
    pub fn standard() -> Self {
        Self::new(standard_table(), LabDefaults::default())
    }

    /// The standard table with lab defaults taken from `config`.
    pub fn from_config(config: &GlyeralConfig) -> Self {
        Self::new(standard_table(), config.lab_defaults)
    }

    pub fn rules(&self) -> &[DrugRule] {
        &self.rules
    }

    pub fn defaults(&self) -> LabDefaults {
        self.defaults
    }

    /// The resolved context this engine would evaluate `profile` against.
    pub fn context_for(&self, profile: &PatientProfile) -> ClinicalContext {
        ClinicalContext::resolve(profile, &self.defaults)
    }
}

impl RecommendationEngine for TableEngine {
    fn evaluate(&self, profile: &PatientProfile) -> Vec<DrugRecommendation> {
        let ctx = self.context_for(profile);
        if ctx.egfr_defaulted || ctx.hba1c_defaulted {
            info!(
                egfr_defaulted = ctx.egfr_defaulted,
                hba1c_defaulted = ctx.hba1c_defaulted,
                "evaluating with defaulted lab values"
            );
        }
        debug!(
            egfr = ctx.egfr,
            hba1c = ctx.hba1c,
            is_pregnant = ctx.is_pregnant,
            has_ckd = ctx.has_ckd,
            has_cad = ctx.has_cad,
            "clinical context resolved"
        );

        self.rules
            .iter()
            .map(|rule| {
                let rec = rule.apply(&ctx);
                debug!(
                    drug_id = %rec.drug_id,
                    status = rec.status.as_str(),
                    confidence = rec.confidence,
                    "rule applied"
                );
                rec
            })
            .collect()
    }

    fn candidate_drugs(&self) -> Vec<DrugId> {
        self.rules.iter().map(|r| DrugId::new(r.drug_id)).collect()
    }
}
