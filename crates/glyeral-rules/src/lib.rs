//! # glyeral-rules
//!
//! The table-driven medication recommendation engine for GLYERAL.
//!
//! ## Overview
//!
//! [`TableEngine`] implements the
//! [`RecommendationEngine`](glyeral_core::traits::RecommendationEngine) trait.
//! Each candidate drug is one [`DrugRule`] row whose dose, block, confidence
//! and caveat are pure functions of the resolved [`ClinicalContext`]. The
//! engine is total: every profile, including an empty one, yields exactly one
//! recommendation per row, in table order.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use glyeral_rules::{GlyeralConfig, TableEngine};
//!
//! let config = GlyeralConfig::standard()?;
//! let engine = TableEngine::from_config(&config);
//! let formulary = config.formulary();
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod formulary;
pub mod rule;
pub mod table;

pub use config::{GlyeralConfig, LabDefaults};
pub use context::{ckd_stage, ClinicalContext};
pub use engine::TableEngine;
pub use formulary::Formulary;
pub use rule::{Dose, DrugRule};
pub use table::standard_table;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use glyeral_contracts::{
        decision::ModificationRequest,
        error::GlyeralError,
        profile::{CkdStage, PatientProfile},
        recommendation::{DrugCategory, DrugId, DrugRecommendation, RecommendationStatus},
    };
    use glyeral_core::traits::RecommendationEngine;

    use crate::{ckd_stage, ClinicalContext, GlyeralConfig, LabDefaults, TableEngine};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn profile(egfr: Option<f64>, hba1c: Option<f64>, is_pregnant: bool) -> PatientProfile {
        PatientProfile {
            egfr,
            hba1c,
            is_pregnant,
            ..PatientProfile::default()
        }
    }

    fn find<'a>(recs: &'a [DrugRecommendation], id: &str) -> &'a DrugRecommendation {
        recs.iter()
            .find(|r| r.drug_id.as_str() == id)
            .unwrap_or_else(|| panic!("no recommendation for {id}"))
    }

    const ALL_IDS: [&str; 12] = [
        "Metformin",
        "Glimepiride",
        "Tradjenta",
        "Farxiga",
        "Semaglutide",
        "Repaglinide_Before_Breakfast",
        "Repaglinide_Before_Lunch",
        "Repaglinide_Before_Dinner",
        "Glargine_Before_Dinner",
        "Lispro_Before_Breakfast",
        "Lispro_Before_Lunch",
        "Lispro_Before_Dinner",
    ];

    // ── 1. totality ───────────────────────────────────────────────────────────

    /// Every profile yields one recommendation per drug, in table order.
    #[test]
    fn test_every_profile_covers_all_twelve_drugs() {
        let engine = TableEngine::standard();
        let profiles = [
            PatientProfile::default(),
            profile(Some(10.0), Some(14.0), true),
            profile(Some(150.0), Some(5.0), false),
            PatientProfile {
                egfr: Some(35.0),
                hba1c: Some(8.7),
                is_pregnant: false,
                has_ckd: true,
                has_cad: true,
            },
        ];

        for p in &profiles {
            let recs = engine.evaluate(p);
            let ids: Vec<&str> = recs.iter().map(|r| r.drug_id.as_str()).collect();
            assert_eq!(ids, ALL_IDS, "table order must be stable for {p:?}");
        }

        let candidates: Vec<DrugId> = ALL_IDS.iter().map(|s| DrugId::from(*s)).collect();
        assert_eq!(engine.candidate_drugs(), candidates);
    }

    /// Blocked iff the first warning is the single BLOCKED entry.
    #[test]
    fn test_block_warning_is_first_and_unique() {
        let engine = TableEngine::standard();
        for egfr in [5.0, 20.0, 27.0, 40.0, 90.0] {
            for pregnant in [false, true] {
                for rec in engine.evaluate(&profile(Some(egfr), None, pregnant)) {
                    let blocked_count = rec
                        .warnings
                        .iter()
                        .filter(|w| w.starts_with(DrugRecommendation::BLOCKED_PREFIX))
                        .count();
                    assert_eq!(rec.is_blocked(), blocked_count == 1, "{}", rec.drug_id);
                    assert!(
                        blocked_count <= 1,
                        "{} has {blocked_count} block warnings",
                        rec.drug_id
                    );
                    assert_eq!(rec.is_blocked(), rec.block_reason().is_some());
                }
            }
        }
    }

    // ── 2. pregnancy ──────────────────────────────────────────────────────────

    /// Pregnancy blocks every non-insulin drug and leaves insulin approved.
    #[test]
    fn test_pregnancy_blocks_all_non_insulin() {
        let engine = TableEngine::standard();
        let recs = engine.evaluate(&profile(None, None, true));

        for rec in &recs {
            match rec.category {
                DrugCategory::Insulin => {
                    assert_eq!(rec.status, RecommendationStatus::Approved, "{}", rec.drug_id);
                }
                DrugCategory::Oral | DrugCategory::Injectable => {
                    assert_eq!(rec.status, RecommendationStatus::Blocked, "{}", rec.drug_id);
                    assert_eq!(rec.warnings[0], "BLOCKED: Pregnancy", "{}", rec.drug_id);
                }
            }
        }

        let glargine = find(&recs, "Glargine_Before_Dinner");
        assert!(glargine.guidelines.iter().any(|g| g == "Safe in pregnancy"));
    }

    /// Class warnings survive a block, after the block reason.
    #[test]
    fn test_blocked_drug_keeps_class_warnings() {
        let recs = TableEngine::standard().evaluate(&profile(None, None, true));
        let glimepiride = find(&recs, "Glimepiride");
        assert_eq!(
            glimepiride.warnings,
            vec!["BLOCKED: Pregnancy", "Hypoglycemia risk", "Weight gain potential"]
        );
    }

    // ── 3. renal floors ───────────────────────────────────────────────────────

    /// Metformin is blocked iff eGFR < 30; Farxiga iff eGFR < 25.
    #[test]
    fn test_renal_floors() {
        let engine = TableEngine::standard();
        for egfr in [10.0, 24.9, 25.0, 29.9, 30.0, 44.9, 45.0, 59.0, 60.0, 120.0] {
            let recs = engine.evaluate(&profile(Some(egfr), None, false));
            assert_eq!(find(&recs, "Metformin").is_blocked(), egfr < 30.0, "metformin at {egfr}");
            assert_eq!(find(&recs, "Farxiga").is_blocked(), egfr < 25.0, "farxiga at {egfr}");
        }
    }

    /// When renal and pregnancy blocks both fire, the renal reason is shown.
    #[test]
    fn test_renal_reason_wins_over_pregnancy() {
        let recs = TableEngine::standard().evaluate(&profile(Some(20.0), None, true));
        assert_eq!(find(&recs, "Metformin").warnings, vec!["BLOCKED: eGFR < 30 - Contraindicated"]);
        assert_eq!(find(&recs, "Farxiga").warnings[0], "BLOCKED: eGFR < 25");
    }

    // ── 4. determinism ────────────────────────────────────────────────────────

    #[test]
    fn test_evaluation_is_deterministic() {
        let engine = TableEngine::standard();
        let p = profile(Some(38.0), Some(9.4), false);
        assert_eq!(engine.evaluate(&p), engine.evaluate(&p));
    }

    // ── 5. scenarios ──────────────────────────────────────────────────────────

    /// Normal kidneys, not pregnant, HbA1c 7.0.
    #[test]
    fn test_scenario_normal_patient() {
        let recs = TableEngine::standard().evaluate(&profile(Some(95.0), Some(7.0), false));

        let metformin = find(&recs, "Metformin");
        assert_eq!(metformin.dose_text, "1000mg twice daily");
        assert_eq!(metformin.original_dosage, "1000mg");
        assert_eq!(metformin.confidence, 95);
        assert_eq!(metformin.status, RecommendationStatus::Approved);
        assert!(metformin.warnings.is_empty());

        let farxiga = find(&recs, "Farxiga");
        assert_eq!(farxiga.dose_text, "10mg once daily");
        assert_eq!(farxiga.confidence, 82);

        let glargine = find(&recs, "Glargine_Before_Dinner");
        assert_eq!(glargine.dose_text, "10 units before dinner");
        assert_eq!(glargine.confidence, 78);
        assert_eq!(glargine.warnings, vec!["May not be needed if HbA1c at goal"]);

        assert_eq!(find(&recs, "Glimepiride").status, RecommendationStatus::Warning);
        assert!(recs.iter().all(|r| !r.is_blocked()));
    }

    /// eGFR 20: Metformin and Farxiga blocked, everything else unaffected.
    #[test]
    fn test_scenario_severe_renal_impairment() {
        let recs = TableEngine::standard().evaluate(&profile(Some(20.0), Some(7.0), false));

        let metformin = find(&recs, "Metformin");
        assert_eq!(metformin.dose_text, "Not recommended");
        assert_eq!(metformin.original_dosage, "500mg");
        assert_eq!(metformin.confidence, 0);

        let farxiga = find(&recs, "Farxiga");
        assert_eq!(farxiga.dose_text, "5mg once daily");
        // Derived CKD from eGFR < 60.
        assert_eq!(farxiga.confidence, 90);

        let blocked: Vec<&str> = recs
            .iter()
            .filter(|r| r.is_blocked())
            .map(|r| r.drug_id.as_str())
            .collect();
        assert_eq!(blocked, vec!["Metformin", "Farxiga"]);
    }

    /// eGFR in [30, 45) reduces Metformin and adds the caveats.
    #[test]
    fn test_scenario_moderate_renal_impairment() {
        let recs = TableEngine::standard().evaluate(&profile(Some(40.0), None, false));

        let metformin = find(&recs, "Metformin");
        assert_eq!(metformin.dose_text, "500mg twice daily");
        assert_eq!(metformin.confidence, 70);
        assert_eq!(metformin.warnings, vec!["Reduce dose for eGFR 30-45"]);

        let farxiga = find(&recs, "Farxiga");
        assert_eq!(farxiga.status, RecommendationStatus::Approved);
        assert_eq!(farxiga.warnings, vec!["Reduced glucose efficacy at lower eGFR"]);
    }

    /// HbA1c 9.5: intensified basal/bolus insulin and higher Semaglutide start.
    #[test]
    fn test_scenario_poor_glycemic_control() {
        let recs = TableEngine::standard().evaluate(&profile(Some(80.0), Some(9.5), false));

        let glargine = find(&recs, "Glargine_Before_Dinner");
        assert_eq!(glargine.dose_text, "20 units before dinner");
        assert_eq!(glargine.original_dosage, "20 units");
        assert_eq!(glargine.confidence, 92);
        assert!(glargine.warnings.is_empty());

        let semaglutide = find(&recs, "Semaglutide");
        assert_eq!(semaglutide.dose_text, "0.5mg weekly → titrate to 1mg");
        assert_eq!(semaglutide.original_dosage, "0.5mg");

        assert_eq!(find(&recs, "Lispro_Before_Breakfast").confidence, 80);
        assert_eq!(find(&recs, "Lispro_Before_Dinner").confidence, 82);
        assert_eq!(find(&recs, "Lispro_Before_Dinner").dose_text, "8 units before dinner");
    }

    /// CAD raises Farxiga confidence even with normal kidneys.
    #[test]
    fn test_cad_raises_farxiga_confidence() {
        let p = PatientProfile {
            has_cad: true,
            ..PatientProfile::default()
        };
        let recs = TableEngine::standard().evaluate(&p);
        assert_eq!(find(&recs, "Farxiga").confidence, 90);
    }

    // ── 6. lab defaulting ─────────────────────────────────────────────────────

    /// Absent labs resolve to eGFR 100 / HbA1c 7.0 and are flagged.
    #[test]
    fn test_missing_labs_use_defaults() {
        let ctx = ClinicalContext::resolve(&PatientProfile::default(), &LabDefaults::default());
        assert_eq!(ctx.egfr, 100.0);
        assert_eq!(ctx.hba1c, 7.0);
        assert!(ctx.egfr_defaulted && ctx.hba1c_defaulted);
        assert!(!ctx.has_ckd);

        let engine = TableEngine::standard();
        assert_eq!(
            engine.evaluate(&PatientProfile::default()),
            engine.evaluate(&profile(Some(100.0), Some(7.0), false))
        );
    }

    /// Unreadable lab strings fall back to the defaults.
    #[test]
    fn test_garbage_labs_default() {
        let p: PatientProfile =
            serde_json::from_value(serde_json::json!({ "egfr": "", "hba1c": "abc" })).unwrap();
        let recs = TableEngine::standard().evaluate(&p);
        assert_eq!(find(&recs, "Metformin").dose_text, "1000mg twice daily");
    }

    /// Configured defaults replace the built-in ones.
    #[test]
    fn test_configured_defaults() {
        let config = GlyeralConfig::from_toml_str(
            r#"
            [lab_defaults]
            egfr = 28.0
            hba1c = 9.5
            "#,
        )
        .unwrap();
        let engine = TableEngine::from_config(&config);
        let recs = engine.evaluate(&PatientProfile::default());

        assert!(find(&recs, "Metformin").is_blocked());
        assert_eq!(find(&recs, "Glargine_Before_Dinner").confidence, 92);
        assert!(engine.context_for(&PatientProfile::default()).has_ckd);
    }

    // ── 7. CKD staging ────────────────────────────────────────────────────────

    #[test]
    fn test_ckd_stage_boundaries() {
        assert_eq!(ckd_stage(Some(90.0)), Some(CkdStage::Normal));
        assert_eq!(ckd_stage(Some(89.9)), Some(CkdStage::Mild));
        assert_eq!(ckd_stage(Some(60.0)), Some(CkdStage::Mild));
        assert_eq!(ckd_stage(Some(30.0)), Some(CkdStage::Moderate));
        assert_eq!(ckd_stage(Some(15.0)), Some(CkdStage::Severe));
        assert_eq!(ckd_stage(Some(14.9)), Some(CkdStage::Failure));
        assert_eq!(ckd_stage(None), None);
        assert_eq!(ckd_stage(Some(0.0)), None);
    }

    // ── 8. configuration ──────────────────────────────────────────────────────

    #[test]
    fn test_standard_config_covers_every_drug() {
        let config = GlyeralConfig::standard().unwrap();
        assert_eq!(config.lab_defaults, LabDefaults::default());

        let formulary = config.formulary();
        assert_eq!(formulary.len(), 12);
        for id in ALL_IDS {
            assert!(formulary.lookup(&DrugId::from(id)).is_some(), "{id} missing from formulary");
        }
    }

    /// Every original dosage the engine emits is a selectable formulary option.
    #[test]
    fn test_original_dosages_are_formulary_options() {
        let formulary = GlyeralConfig::standard().unwrap().formulary();
        let engine = TableEngine::standard();
        for p in [profile(Some(95.0), Some(9.5), false), profile(Some(35.0), Some(6.0), false)] {
            for rec in engine.evaluate(&p) {
                let entry = formulary.lookup(&rec.drug_id).unwrap();
                assert!(
                    entry.dosage_options.contains(&rec.original_dosage),
                    "{} original dosage {} not offered",
                    rec.drug_id,
                    rec.original_dosage
                );
            }
        }
    }

    #[test]
    fn test_toml_parse_error() {
        let err = GlyeralConfig::from_toml_str("[lab_defaults\negfr = ").unwrap_err();
        match err {
            GlyeralError::ConfigError { reason } => {
                assert!(reason.contains("failed to parse configuration TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_lab_default_rejected() {
        let err =
            GlyeralConfig::from_toml_str("[lab_defaults]\negfr = 0.0\nhba1c = 7.0").unwrap_err();
        assert!(matches!(err, GlyeralError::ConfigError { ref reason } if reason.contains("egfr")));
    }

    #[test]
    fn test_duplicate_formulary_entry_rejected() {
        let entry = r#"
            [[formulary]]
            drug_id = "Tradjenta"
            drug_class = "DPP-4 Inhibitor"
            dosage_range = "5mg"
            dosage_options = ["5mg"]
            frequency_options = ["Once daily"]
            timing_options = ["Morning"]
            unit = "mg"
        "#;
        let err = GlyeralConfig::from_toml_str(&format!("{entry}{entry}")).unwrap_err();
        assert!(
            matches!(err, GlyeralError::ConfigError { ref reason } if reason.contains("duplicate"))
        );
    }

    // ── 9. formulary ──────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_drug_gets_placeholder_view() {
        let formulary = GlyeralConfig::standard().unwrap().formulary();
        let view = formulary.view(&DrugId::from("Insulin_Degludec"));

        assert!(!view.known);
        assert_eq!(view.drug_class, "N/A");
        assert_eq!(view.dosage_range, "N/A");
        assert_eq!(view.frequency_options, vec!["Once daily"]);
        assert_eq!(view.timing_options, vec!["Morning"]);
    }

    #[test]
    fn test_draft_modification_prefills_from_formulary() {
        let formulary = GlyeralConfig::standard().unwrap().formulary();
        let recs = TableEngine::standard().evaluate(&profile(Some(40.0), None, false));

        let draft = formulary.draft_modification(find(&recs, "Metformin"));
        assert_eq!(draft.dosage, "500mg");
        assert_eq!(draft.frequency, "Once daily");
        assert_eq!(draft.timing, "With breakfast");
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn test_complete_modification_fills_blank_frequency_and_timing() {
        let formulary = GlyeralConfig::standard().unwrap().formulary();
        let request = ModificationRequest {
            dosage: " 500mg ".to_string(),
            frequency: String::new(),
            timing: "  ".to_string(),
            notes: " GI intolerance ".to_string(),
        };

        let completed = formulary.complete_modification(&DrugId::from("Metformin"), request);
        assert_eq!(completed.dosage, "500mg");
        assert_eq!(completed.frequency, "Once daily", "first formulary option");
        assert_eq!(completed.timing, "With breakfast", "first formulary option");
        assert_eq!(completed.notes, "GI intolerance");

        let unknown = formulary.complete_modification(
            &DrugId::from("Insulin_Degludec"),
            ModificationRequest {
                dosage: "10 units".to_string(),
                frequency: String::new(),
                timing: String::new(),
                notes: "trial".to_string(),
            },
        );
        assert_eq!(unknown.frequency, "Once daily");
        assert_eq!(unknown.timing, "Morning");
    }
}
