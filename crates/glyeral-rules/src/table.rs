//! The standard drug table.
//!
//! Twelve slots in display order: five single-dose drugs, three meal-time
//! Repaglinide slots, basal Glargine, and three meal-time Lispro slots.
//! Thresholds are strict or inclusive exactly as written below.

use glyeral_contracts::recommendation::{DrugCategory, RecommendationStatus};

use crate::context::ClinicalContext;
use crate::rule::{never_blocked, no_caveat, pregnancy_only, Dose, DrugRule, PREGNANCY_BLOCK};

const REPAGLINIDE_GUIDELINE: &str = "Alternative to sulfonylureas";
const LISPRO_GUIDELINE: &str = "ADA: Bolus insulin for post-meal control";
const SAFE_IN_PREGNANCY: &str = "Safe in pregnancy";

/// Build the standard table, in display order.
pub fn standard_table() -> Vec<DrugRule> {
    vec![
        DrugRule {
            drug_id: "Metformin",
            category: DrugCategory::Oral,
            base_status: RecommendationStatus::Approved,
            dose: |ctx| {
                if ctx.egfr >= 45.0 {
                    Dose::new("1000mg twice daily", "1000mg")
                } else if ctx.egfr >= 30.0 {
                    Dose::new("500mg twice daily", "500mg")
                } else {
                    Dose::new("Not recommended", "500mg")
                }
            },
            block: |ctx| {
                if ctx.egfr < 30.0 {
                    Some("eGFR < 30 - Contraindicated")
                } else {
                    ctx.is_pregnant.then_some(PREGNANCY_BLOCK)
                }
            },
            confidence: |ctx| {
                if ctx.egfr >= 45.0 {
                    95
                } else if ctx.egfr >= 30.0 {
                    70
                } else {
                    0
                }
            },
            caveat: |ctx| {
                (ctx.egfr >= 30.0 && ctx.egfr < 45.0).then_some("Reduce dose for eGFR 30-45")
            },
            class_warnings: &[],
            guidelines: &["ADA 2025 First-line therapy"],
        },
        DrugRule {
            drug_id: "Glimepiride",
            category: DrugCategory::Oral,
            base_status: RecommendationStatus::Warning,
            dose: |_| Dose::new("2mg once daily before breakfast", "2mg"),
            block: pregnancy_only,
            confidence: |_| 55,
            caveat: no_caveat,
            class_warnings: &["Hypoglycemia risk", "Weight gain potential"],
            guidelines: &["Second-line if Metformin intolerant"],
        },
        DrugRule {
            drug_id: "Tradjenta",
            category: DrugCategory::Oral,
            base_status: RecommendationStatus::Approved,
            dose: |_| Dose::new("5mg once daily", "5mg"),
            block: pregnancy_only,
            confidence: |_| 75,
            caveat: no_caveat,
            class_warnings: &[],
            guidelines: &["No renal dose adjustment needed", "ADA: DPP-4i option"],
        },
        DrugRule {
            drug_id: "Farxiga",
            category: DrugCategory::Oral,
            base_status: RecommendationStatus::Approved,
            dose: |ctx| {
                if ctx.egfr >= 45.0 {
                    Dose::new("10mg once daily", "10mg")
                } else {
                    Dose::new("5mg once daily", "5mg")
                }
            },
            block: |ctx| {
                if ctx.egfr < 25.0 {
                    Some("eGFR < 25")
                } else {
                    ctx.is_pregnant.then_some(PREGNANCY_BLOCK)
                }
            },
            confidence: |ctx| if ctx.has_cad || ctx.has_ckd { 90 } else { 82 },
            caveat: |ctx| {
                (ctx.egfr >= 25.0 && ctx.egfr < 45.0)
                    .then_some("Reduced glucose efficacy at lower eGFR")
            },
            class_warnings: &[],
            guidelines: &["KDIGO 2024: CKD benefit", "AHA: Heart failure protection"],
        },
        DrugRule {
            drug_id: "Semaglutide",
            category: DrugCategory::Injectable,
            base_status: RecommendationStatus::Approved,
            dose: |ctx| {
                if ctx.hba1c > 8.0 {
                    Dose::new("0.5mg weekly → titrate to 1mg", "0.5mg")
                } else {
                    Dose::new("0.25mg weekly → titrate to 0.5mg", "0.25mg")
                }
            },
            block: pregnancy_only,
            confidence: |_| 88,
            caveat: no_caveat,
            class_warnings: &["Start low, titrate slowly for GI tolerance"],
            guidelines: &["ADA: Weight loss benefit", "AHA: CV risk reduction"],
        },
        DrugRule {
            drug_id: "Repaglinide_Before_Breakfast",
            category: DrugCategory::Oral,
            base_status: RecommendationStatus::Warning,
            dose: |_| Dose::new("1mg before breakfast", "1mg"),
            block: pregnancy_only,
            confidence: |_| 50,
            caveat: no_caveat,
            class_warnings: &["Hypoglycemia risk", "Requires meal-time dosing"],
            guidelines: &[REPAGLINIDE_GUIDELINE, "Flexible meal-time dosing"],
        },
        DrugRule {
            drug_id: "Repaglinide_Before_Lunch",
            category: DrugCategory::Oral,
            base_status: RecommendationStatus::Warning,
            dose: |_| Dose::new("1mg before lunch", "1mg"),
            block: pregnancy_only,
            confidence: |_| 50,
            caveat: no_caveat,
            class_warnings: &["Hypoglycemia risk"],
            guidelines: &[REPAGLINIDE_GUIDELINE],
        },
        DrugRule {
            drug_id: "Repaglinide_Before_Dinner",
            category: DrugCategory::Oral,
            base_status: RecommendationStatus::Warning,
            dose: |_| Dose::new("1mg before dinner", "1mg"),
            block: pregnancy_only,
            confidence: |_| 50,
            caveat: no_caveat,
            class_warnings: &["Hypoglycemia risk"],
            guidelines: &[REPAGLINIDE_GUIDELINE],
        },
        DrugRule {
            drug_id: "Glargine_Before_Dinner",
            category: DrugCategory::Insulin,
            base_status: RecommendationStatus::Approved,
            dose: |ctx| {
                if ctx.hba1c > 9.0 {
                    Dose::new("20 units before dinner", "20 units")
                } else {
                    Dose::new("10 units before dinner", "10 units")
                }
            },
            block: never_blocked,
            confidence: |ctx| if ctx.hba1c > 9.0 { 92 } else { 78 },
            caveat: |ctx| (ctx.hba1c <= 7.5).then_some("May not be needed if HbA1c at goal"),
            class_warnings: &[],
            guidelines: &["ADA: Basal insulin when HbA1c > 9%", SAFE_IN_PREGNANCY],
        },
        DrugRule {
            drug_id: "Lispro_Before_Breakfast",
            category: DrugCategory::Insulin,
            base_status: RecommendationStatus::Approved,
            dose: |_| Dose::new("6 units before breakfast", "6 units"),
            block: never_blocked,
            confidence: lispro_confidence,
            caveat: no_caveat,
            class_warnings: &["Monitor for hypoglycemia", "Adjust based on carb intake"],
            guidelines: &[LISPRO_GUIDELINE, SAFE_IN_PREGNANCY],
        },
        DrugRule {
            drug_id: "Lispro_Before_Lunch",
            category: DrugCategory::Insulin,
            base_status: RecommendationStatus::Approved,
            dose: |_| Dose::new("6 units before lunch", "6 units"),
            block: never_blocked,
            confidence: lispro_confidence,
            caveat: no_caveat,
            class_warnings: &["Monitor for hypoglycemia"],
            guidelines: &[LISPRO_GUIDELINE],
        },
        DrugRule {
            drug_id: "Lispro_Before_Dinner",
            category: DrugCategory::Insulin,
            base_status: RecommendationStatus::Approved,
            dose: |_| Dose::new("8 units before dinner", "8 units"),
            block: never_blocked,
            confidence: |ctx| if ctx.hba1c > 8.5 { 82 } else { 62 },
            caveat: no_caveat,
            class_warnings: &["Monitor for hypoglycemia"],
            guidelines: &[LISPRO_GUIDELINE],
        },
    ]
}

fn lispro_confidence(ctx: &ClinicalContext) -> u8 {
    if ctx.hba1c > 8.5 {
        80
    } else {
        60
    }
}
