//! Drug rule row type.
//!
//! A `DrugRule` is one row of the recommendation table. Every computed field
//! is a plain function of the resolved `ClinicalContext`, so a rule holds no
//! state and evaluating it twice gives the same answer.

use glyeral_contracts::recommendation::{
    DrugCategory, DrugId, DrugRecommendation, RecommendationStatus,
};

use crate::context::ClinicalContext;

/// A computed dose: the display text plus the canonical starting dosage used
/// to pre-fill the modification form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dose {
    pub text: &'static str,
    pub original: &'static str,
}

impl Dose {
    pub const fn new(text: &'static str, original: &'static str) -> Self {
        Self { text, original }
    }
}

/// Block explanation produced when a pregnant patient meets a non-insulin drug.
pub const PREGNANCY_BLOCK: &str = "Pregnancy";

/// One row of the drug table.
#[derive(Clone)]
pub struct DrugRule {
    pub drug_id: &'static str,
    pub category: DrugCategory,

    /// Status when no hard contraindication fires.
    pub base_status: RecommendationStatus,

    pub dose: fn(&ClinicalContext) -> Dose,

    /// Hard contraindication, without the `BLOCKED:` prefix. At most one
    /// reason is returned; rows list their checks in priority order.
    pub block: fn(&ClinicalContext) -> Option<&'static str>,

    pub confidence: fn(&ClinicalContext) -> u8,

    /// Context-dependent dose caveat, shown ahead of the class warnings.
    pub caveat: fn(&ClinicalContext) -> Option<&'static str>,

    /// Warnings that always apply to this drug.
    pub class_warnings: &'static [&'static str],

    pub guidelines: &'static [&'static str],
}

impl std::fmt::Debug for DrugRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrugRule")
            .field("drug_id", &self.drug_id)
            .field("category", &self.category)
            .field("base_status", &self.base_status)
            .finish_non_exhaustive()
    }
}

impl DrugRule {
    /// Apply this row to `ctx`.
    ///
    /// Warnings are ordered block reason, dose caveat, class warnings. A block
    /// forces `Blocked` status but keeps the remaining warnings.
    pub fn apply(&self, ctx: &ClinicalContext) -> DrugRecommendation {
        let dose = (self.dose)(ctx);
        let block = (self.block)(ctx);

        let mut warnings = Vec::with_capacity(self.class_warnings.len() + 2);
        if let Some(reason) = block {
            warnings.push(format!("{} {}", DrugRecommendation::BLOCKED_PREFIX, reason));
        }
        if let Some(caveat) = (self.caveat)(ctx) {
            warnings.push(caveat.to_string());
        }
        warnings.extend(self.class_warnings.iter().map(|w| w.to_string()));

        let status = if block.is_some() {
            RecommendationStatus::Blocked
        } else {
            self.base_status
        };

        DrugRecommendation {
            drug_id: DrugId::new(self.drug_id),
            dose_text: dose.text.to_string(),
            original_dosage: dose.original.to_string(),
            confidence: (self.confidence)(ctx).min(100),
            status,
            guidelines: self.guidelines.iter().map(|g| g.to_string()).collect(),
            warnings,
            category: self.category,
        }
    }
}

/// Shared block function for drugs whose only contraindication is pregnancy.
pub fn pregnancy_only(ctx: &ClinicalContext) -> Option<&'static str> {
    ctx.is_pregnant.then_some(PREGNANCY_BLOCK)
}

/// Block function for drugs that are safe in pregnancy and have no renal floor.
pub fn never_blocked(_: &ClinicalContext) -> Option<&'static str> {
    None
}

pub fn no_caveat(_: &ClinicalContext) -> Option<&'static str> {
    None
}
