//! The review session: one patient, one recommendation list, and every
//! physician decision taken against it.
//!
//! The session enforces the review pipeline:
//!
//!   Profile → Engine::evaluate → Verify → [physician action] → Verify → Record
//!
//! A recommendation list reaches the physician only after the verifier
//! passes it. A modification reaches the decision log only after the
//! verifier passes the request. Original recommendations are never mutated;
//! a modification produces a separate `ModifiedRecommendation`.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use glyeral_contracts::{
    decision::{
        DecisionAction, DecisionRecord, ModificationRequest, ModifiedRecommendation, SessionId,
    },
    error::{GlyeralError, GlyeralResult},
    profile::PatientProfile,
    recommendation::{DrugId, DrugRecommendation},
};

use crate::traits::{DecisionRecorder, RecommendationEngine, Verifier};

/// Drives a single physician review for one patient.
///
/// Construct one session per patient review. The session owns the engine,
/// verifier, and recorder, and holds the latest decision per drug.
pub struct ReviewSession {
    session_id: SessionId,
    patient_id: String,
    engine: Box<dyn RecommendationEngine>,
    verifier: Box<dyn Verifier>,
    recorder: Box<dyn DecisionRecorder>,
    recommendations: Vec<DrugRecommendation>,
    decisions: HashMap<DrugId, DecisionRecord>,
}

impl ReviewSession {
    pub fn new(
        patient_id: impl Into<String>,
        engine: Box<dyn RecommendationEngine>,
        verifier: Box<dyn Verifier>,
        recorder: Box<dyn DecisionRecorder>,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            patient_id: patient_id.into(),
            engine,
            verifier,
            recorder,
            recommendations: Vec::new(),
            decisions: HashMap::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// The current recommendation list, empty before the first `generate()`.
    pub fn recommendations(&self) -> &[DrugRecommendation] {
        &self.recommendations
    }

    /// Evaluate `profile`, verify the result, and make it the current list.
    ///
    /// Regenerating discards every decision taken against the previous list;
    /// those decisions remain in the recorder's log.
    ///
    /// # Errors
    ///
    /// `VerificationFailed` if the engine output breaks an output invariant.
    /// The previous list is kept in that case.
    pub fn generate(&mut self, profile: &PatientProfile) -> GlyeralResult<&[DrugRecommendation]> {
        let session_id = self.session_id.0.to_string();
        debug!(
            session_id = %session_id,
            patient_id = %self.patient_id,
            egfr = ?profile.egfr,
            hba1c = ?profile.hba1c,
            "generating recommendations"
        );

        let recommendations = self.engine.evaluate(profile);
        let expected = self.engine.candidate_drugs();

        let report = self
            .verifier
            .verify_recommendations(&recommendations, &expected)?;
        if !report.passed {
            let summary = report.summary();
            warn!(
                session_id = %session_id,
                failures = %summary,
                "recommendation verification failed"
            );
            return Err(GlyeralError::VerificationFailed { reason: summary });
        }

        let blocked = recommendations.iter().filter(|r| r.is_blocked()).count();
        info!(
            session_id = %session_id,
            patient_id = %self.patient_id,
            count = recommendations.len(),
            blocked,
            "recommendations ready for review"
        );

        self.recommendations = recommendations;
        self.decisions.clear();
        Ok(&self.recommendations)
    }

    /// Accept a recommendation as prescribed.
    ///
    /// # Errors
    ///
    /// `RecommendationBlocked` for a blocked drug; `RecommendationNotFound`
    /// for a drug not in the current list.
    pub fn accept(&mut self, drug_id: &DrugId) -> GlyeralResult<DecisionRecord> {
        let recommendation = self.find(drug_id)?.clone();
        self.ensure_prescribable(&recommendation)?;

        let record = self.new_record(recommendation, DecisionAction::Accepted, None, None);
        self.commit(record)
    }

    /// Reject a recommendation. Blocked drugs may be rejected; the reason is optional.
    pub fn reject(
        &mut self,
        drug_id: &DrugId,
        reason: Option<String>,
    ) -> GlyeralResult<DecisionRecord> {
        let recommendation = self.find(drug_id)?.clone();
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let record = self.new_record(recommendation, DecisionAction::Rejected, None, reason);
        self.commit(record)
    }

    /// Record a physician modification and return the new modified record.
    ///
    /// The original recommendation in `recommendations()` is left unchanged.
    /// The verifier completes blank fields before checking the request.
    ///
    /// # Errors
    ///
    /// `Validation` when the verifier refuses the request (e.g. empty notes);
    /// nothing is recorded in that case.
    pub fn modify(
        &mut self,
        drug_id: &DrugId,
        request: ModificationRequest,
    ) -> GlyeralResult<ModifiedRecommendation> {
        let recommendation = self.find(drug_id)?.clone();
        self.ensure_prescribable(&recommendation)?;

        let request = self.verifier.complete_modification(&recommendation, request);
        let report = self.verifier.verify_modification(&recommendation, &request)?;
        if !report.passed {
            let summary = report.summary();
            warn!(
                session_id = %self.session_id.0,
                drug_id = %drug_id,
                failures = %summary,
                "modification refused"
            );
            return Err(GlyeralError::Validation { reason: summary });
        }

        let dosage = request.dosage.trim().to_string();
        let modified = ModifiedRecommendation {
            original: recommendation.clone(),
            dose_text: format!("{} {}", dosage, request.frequency.trim().to_lowercase()),
            modified_dosage: dosage,
            frequency: request.frequency.trim().to_string(),
            timing: request.timing.trim().to_string(),
            notes: request.notes.trim().to_string(),
            status: DecisionAction::Modified,
            modified_at: Utc::now(),
        };

        let record = self.new_record(
            recommendation,
            DecisionAction::Modified,
            Some(modified.clone()),
            None,
        );
        self.commit(record)?;
        Ok(modified)
    }

    /// The latest decision for `drug_id` in this review, if any.
    pub fn decision_for(&self, drug_id: &DrugId) -> Option<&DecisionRecord> {
        self.decisions.get(drug_id)
    }

    /// Recommendations that have not been actioned yet, in list order.
    pub fn pending(&self) -> impl Iterator<Item = &DrugRecommendation> + '_ {
        self.recommendations
            .iter()
            .filter(|r| !self.decisions.contains_key(&r.drug_id))
    }

    /// Close the review and let the recorder seal its log.
    pub fn finish(&self) -> GlyeralResult<()> {
        info!(
            session_id = %self.session_id.0,
            decisions = self.decisions.len(),
            pending = self.pending().count(),
            "review finished"
        );
        self.recorder.finalize(&self.session_id.0.to_string())
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn find(&self, drug_id: &DrugId) -> GlyeralResult<&DrugRecommendation> {
        if self.recommendations.is_empty() {
            return Err(GlyeralError::NoRecommendations);
        }
        self.recommendations
            .iter()
            .find(|r| &r.drug_id == drug_id)
            .ok_or_else(|| GlyeralError::RecommendationNotFound {
                drug_id: drug_id.to_string(),
            })
    }

    fn ensure_prescribable(&self, recommendation: &DrugRecommendation) -> GlyeralResult<()> {
        if !recommendation.is_blocked() {
            return Ok(());
        }
        let reason = recommendation
            .block_reason()
            .unwrap_or("hard contraindication")
            .to_string();
        warn!(
            session_id = %self.session_id.0,
            drug_id = %recommendation.drug_id,
            reason = %reason,
            "refused action on blocked recommendation"
        );
        Err(GlyeralError::RecommendationBlocked {
            drug_id: recommendation.drug_id.to_string(),
            reason,
        })
    }

    fn new_record(
        &self,
        recommendation: DrugRecommendation,
        action: DecisionAction,
        modification: Option<ModifiedRecommendation>,
        reason: Option<String>,
    ) -> DecisionRecord {
        DecisionRecord {
            decision_id: uuid::Uuid::new_v4(),
            session_id: self.session_id.clone(),
            patient_id: self.patient_id.clone(),
            drug_id: recommendation.drug_id.clone(),
            action,
            recommendation,
            modification,
            reason,
            timestamp: Utc::now(),
        }
    }

    /// Write the record first; only a recorded decision updates session state.
    fn commit(&mut self, record: DecisionRecord) -> GlyeralResult<DecisionRecord> {
        self.recorder.record(&record)?;
        info!(
            session_id = %self.session_id.0,
            drug_id = %record.drug_id,
            action = record.action.as_str(),
            "decision recorded"
        );
        self.decisions.insert(record.drug_id.clone(), record.clone());
        Ok(record)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use glyeral_contracts::{
        decision::{DecisionAction, DecisionRecord, ModificationRequest},
        error::{GlyeralError, GlyeralResult},
        profile::PatientProfile,
        recommendation::{DrugCategory, DrugId, DrugRecommendation, RecommendationStatus},
        verify::{VerificationFailure, VerificationReport},
    };

    use crate::traits::{DecisionRecorder, RecommendationEngine, Verifier};

    use super::ReviewSession;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn rec(id: &str, status: RecommendationStatus) -> DrugRecommendation {
        let warnings = if status == RecommendationStatus::Blocked {
            vec!["BLOCKED: Pregnancy".to_string()]
        } else {
            vec![]
        };
        DrugRecommendation {
            drug_id: DrugId::new(id),
            dose_text: "5mg once daily".to_string(),
            original_dosage: "5mg".to_string(),
            confidence: 75,
            status,
            guidelines: vec![],
            warnings,
            category: DrugCategory::Oral,
        }
    }

    /// An engine that blocks Tradjenta when the profile is pregnant.
    struct MockEngine;

    impl RecommendationEngine for MockEngine {
        fn evaluate(&self, profile: &PatientProfile) -> Vec<DrugRecommendation> {
            let tradjenta = if profile.is_pregnant {
                RecommendationStatus::Blocked
            } else {
                RecommendationStatus::Approved
            };
            vec![
                rec("Tradjenta", tradjenta),
                rec("Glargine_Before_Dinner", RecommendationStatus::Approved),
            ]
        }

        fn candidate_drugs(&self) -> Vec<DrugId> {
            vec![DrugId::new("Tradjenta"), DrugId::new("Glargine_Before_Dinner")]
        }
    }

    /// A verifier that passes lists as configured and refuses blank notes.
    struct MockVerifier {
        pass_lists: bool,
    }

    impl Verifier for MockVerifier {
        fn verify_recommendations(
            &self,
            _recommendations: &[DrugRecommendation],
            _expected: &[DrugId],
        ) -> GlyeralResult<VerificationReport> {
            if self.pass_lists {
                Ok(VerificationReport::from_failures(vec![]))
            } else {
                Ok(VerificationReport::from_failures(vec![VerificationFailure::new(
                    "coverage",
                    "drug 'Metformin' is missing",
                )]))
            }
        }

        fn complete_modification(
            &self,
            _recommendation: &DrugRecommendation,
            mut request: ModificationRequest,
        ) -> ModificationRequest {
            if request.frequency.trim().is_empty() {
                request.frequency = "Once daily".to_string();
            }
            if request.timing.trim().is_empty() {
                request.timing = "Morning".to_string();
            }
            request
        }

        fn verify_modification(
            &self,
            _recommendation: &DrugRecommendation,
            request: &ModificationRequest,
        ) -> GlyeralResult<VerificationReport> {
            let mut failures = vec![];
            if request.frequency.trim().is_empty() || request.timing.trim().is_empty() {
                failures.push(VerificationFailure::new("frequency-required", "blank selection"));
            }
            if request.notes.trim().is_empty() {
                failures.push(VerificationFailure::new("notes-required", "notes are required"));
            }
            Ok(VerificationReport::from_failures(failures))
        }
    }

    /// A recorder that captures every call for later inspection.
    #[derive(Clone)]
    struct MockRecorder {
        records: Arc<Mutex<Vec<DecisionRecord>>>,
        finalized: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl MockRecorder {
        fn new() -> Self {
            Self {
                records: Arc::new(Mutex::new(vec![])),
                finalized: Arc::new(Mutex::new(vec![])),
                fail: false,
            }
        }
    }

    impl DecisionRecorder for MockRecorder {
        fn record(&self, record: &DecisionRecord) -> GlyeralResult<()> {
            if self.fail {
                return Err(GlyeralError::AuditWriteFailed {
                    reason: "store offline".to_string(),
                });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn finalize(&self, session_id: &str) -> GlyeralResult<()> {
            self.finalized.lock().unwrap().push(session_id.to_string());
            Ok(())
        }
    }

    fn session(recorder: MockRecorder) -> ReviewSession {
        ReviewSession::new(
            "MR-2024-001",
            Box::new(MockEngine),
            Box::new(MockVerifier { pass_lists: true }),
            Box::new(recorder),
        )
    }

    fn request(notes: &str) -> ModificationRequest {
        ModificationRequest {
            dosage: "10mg".to_string(),
            frequency: "Once daily".to_string(),
            timing: "Morning".to_string(),
            notes: notes.to_string(),
        }
    }

    // ── generate ─────────────────────────────────────────────────────────────

    #[test]
    fn generate_publishes_verified_list() {
        let mut review = session(MockRecorder::new());
        let recs = review.generate(&PatientProfile::default()).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(review.pending().count(), 2);
    }

    #[test]
    fn generate_refuses_failing_verification() {
        let mut review = ReviewSession::new(
            "MR-2024-001",
            Box::new(MockEngine),
            Box::new(MockVerifier { pass_lists: false }),
            Box::new(MockRecorder::new()),
        );

        match review.generate(&PatientProfile::default()) {
            Err(GlyeralError::VerificationFailed { reason }) => {
                assert!(reason.contains("[coverage]"), "unexpected reason: {reason}");
            }
            other => panic!("expected VerificationFailed, got {:?}", other),
        }
        assert!(review.recommendations().is_empty());
    }

    #[test]
    fn regenerate_clears_previous_decisions() {
        let recorder = MockRecorder::new();
        let mut review = session(recorder.clone());
        review.generate(&PatientProfile::default()).unwrap();
        review.accept(&DrugId::new("Tradjenta")).unwrap();
        assert!(review.decision_for(&DrugId::new("Tradjenta")).is_some());

        review.generate(&PatientProfile::default()).unwrap();
        assert!(review.decision_for(&DrugId::new("Tradjenta")).is_none());
        // The log keeps the earlier decision.
        assert_eq!(recorder.records.lock().unwrap().len(), 1);
    }

    // ── accept / reject ──────────────────────────────────────────────────────

    #[test]
    fn accept_records_decision() {
        let recorder = MockRecorder::new();
        let mut review = session(recorder.clone());
        review.generate(&PatientProfile::default()).unwrap();

        let record = review.accept(&DrugId::new("Tradjenta")).unwrap();
        assert_eq!(record.action, DecisionAction::Accepted);
        assert_eq!(record.patient_id, "MR-2024-001");
        assert_eq!(record.session_id, *review.session_id());

        let records = recorder.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].drug_id, DrugId::new("Tradjenta"));
    }

    #[test]
    fn accept_blocked_recommendation_is_refused() {
        let recorder = MockRecorder::new();
        let mut review = session(recorder.clone());
        let pregnant = PatientProfile {
            is_pregnant: true,
            ..PatientProfile::default()
        };
        review.generate(&pregnant).unwrap();

        match review.accept(&DrugId::new("Tradjenta")) {
            Err(GlyeralError::RecommendationBlocked { drug_id, reason }) => {
                assert_eq!(drug_id, "Tradjenta");
                assert!(reason.contains("Pregnancy"));
            }
            other => panic!("expected RecommendationBlocked, got {:?}", other),
        }
        assert!(recorder.records.lock().unwrap().is_empty());
    }

    #[test]
    fn reject_blocked_recommendation_is_allowed() {
        let mut review = session(MockRecorder::new());
        let pregnant = PatientProfile {
            is_pregnant: true,
            ..PatientProfile::default()
        };
        review.generate(&pregnant).unwrap();

        let record = review
            .reject(&DrugId::new("Tradjenta"), Some("  contraindicated in pregnancy ".to_string()))
            .unwrap();
        assert_eq!(record.action, DecisionAction::Rejected);
        assert_eq!(record.reason.as_deref(), Some("contraindicated in pregnancy"));
    }

    #[test]
    fn reject_blank_reason_is_dropped() {
        let mut review = session(MockRecorder::new());
        review.generate(&PatientProfile::default()).unwrap();
        let record = review
            .reject(&DrugId::new("Tradjenta"), Some("   ".to_string()))
            .unwrap();
        assert_eq!(record.reason, None);
    }

    #[test]
    fn action_before_generate_is_refused() {
        let mut review = session(MockRecorder::new());
        assert!(matches!(
            review.accept(&DrugId::new("Tradjenta")),
            Err(GlyeralError::NoRecommendations)
        ));
    }

    #[test]
    fn unknown_drug_is_not_found() {
        let mut review = session(MockRecorder::new());
        review.generate(&PatientProfile::default()).unwrap();
        match review.accept(&DrugId::new("Insulin_Degludec")) {
            Err(GlyeralError::RecommendationNotFound { drug_id }) => {
                assert_eq!(drug_id, "Insulin_Degludec");
            }
            other => panic!("expected RecommendationNotFound, got {:?}", other),
        }
    }

    #[test]
    fn failed_write_leaves_decision_unrecorded() {
        let mut recorder = MockRecorder::new();
        recorder.fail = true;
        let mut review = session(recorder);
        review.generate(&PatientProfile::default()).unwrap();

        assert!(matches!(
            review.accept(&DrugId::new("Tradjenta")),
            Err(GlyeralError::AuditWriteFailed { .. })
        ));
        assert!(review.decision_for(&DrugId::new("Tradjenta")).is_none());
    }

    // ── modify ───────────────────────────────────────────────────────────────

    #[test]
    fn modify_with_empty_notes_is_refused_and_not_recorded() {
        let recorder = MockRecorder::new();
        let mut review = session(recorder.clone());
        review.generate(&PatientProfile::default()).unwrap();

        match review.modify(&DrugId::new("Tradjenta"), request("   ")) {
            Err(GlyeralError::Validation { reason }) => {
                assert!(reason.contains("notes-required"), "unexpected reason: {reason}");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
        assert!(recorder.records.lock().unwrap().is_empty());
        assert!(review.decision_for(&DrugId::new("Tradjenta")).is_none());
    }

    #[test]
    fn modify_produces_new_record_and_keeps_original() {
        let recorder = MockRecorder::new();
        let mut review = session(recorder.clone());
        review.generate(&PatientProfile::default()).unwrap();

        let modified = review
            .modify(&DrugId::new("Tradjenta"), request("patient preference"))
            .unwrap();

        assert_eq!(modified.status, DecisionAction::Modified);
        assert_eq!(modified.dose_text, "10mg once daily");
        assert_eq!(modified.modified_dosage, "10mg");
        assert_eq!(modified.notes, "patient preference");
        assert_eq!(modified.original.dose_text, "5mg once daily");

        // The list still shows the engine's original recommendation.
        let original = &review.recommendations()[0];
        assert_eq!(original.dose_text, "5mg once daily");

        let value = serde_json::to_value(&modified).unwrap();
        assert_eq!(value["status"], "modified");
        assert!(value.get("modifiedAt").is_some());

        let records = recorder.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, DecisionAction::Modified);
        assert!(records[0].modification.is_some());
    }

    #[test]
    fn modify_records_completed_request() {
        let recorder = MockRecorder::new();
        let mut review = session(recorder.clone());
        review.generate(&PatientProfile::default()).unwrap();

        let blank = ModificationRequest {
            frequency: String::new(),
            timing: "  ".to_string(),
            ..request("GI intolerance")
        };
        let modified = review.modify(&DrugId::new("Tradjenta"), blank).unwrap();

        assert_eq!(modified.dose_text, "10mg once daily");
        assert_eq!(modified.frequency, "Once daily");
        assert_eq!(modified.timing, "Morning");
        let records = recorder.records.lock().unwrap();
        let stored = records[0].modification.as_ref().unwrap();
        assert_eq!(stored.timing, "Morning");
    }

    #[test]
    fn later_decision_supersedes_earlier_one() {
        let recorder = MockRecorder::new();
        let mut review = session(recorder.clone());
        review.generate(&PatientProfile::default()).unwrap();

        review.accept(&DrugId::new("Tradjenta")).unwrap();
        review.reject(&DrugId::new("Tradjenta"), None).unwrap();

        let latest = review.decision_for(&DrugId::new("Tradjenta")).unwrap();
        assert_eq!(latest.action, DecisionAction::Rejected);
        assert_eq!(recorder.records.lock().unwrap().len(), 2);
        assert_eq!(review.pending().count(), 1);
    }

    #[test]
    fn finish_finalizes_recorder() {
        let recorder = MockRecorder::new();
        let review = session(recorder.clone());
        review.finish().unwrap();

        let finalized = recorder.finalized.lock().unwrap();
        assert_eq!(finalized.as_slice(), &[review.session_id().0.to_string()]);
    }
}
