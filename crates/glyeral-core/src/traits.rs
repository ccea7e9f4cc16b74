//! Core trait definitions for the GLYERAL review pipeline.
//!
//! These three traits define the seams the review session is wired from:
//!
//! - `RecommendationEngine`: pure rule evaluation over a patient profile
//! - `Verifier`: checks engine output and physician modifications
//! - `DecisionRecorder`: append-only sink for physician decisions
//!
//! The review session calls them in a fixed order. The engine never sees
//! decision state; the recorder never sees a request the verifier refused.

use glyeral_contracts::{
    decision::{DecisionRecord, ModificationRequest},
    error::GlyeralResult,
    profile::PatientProfile,
    recommendation::{DrugId, DrugRecommendation},
    verify::VerificationReport,
};

/// A deterministic medication recommendation evaluator.
///
/// Implementations must be total: every well-typed profile, including one
/// with all labs absent, yields exactly one recommendation per candidate drug.
pub trait RecommendationEngine: Send + Sync {
    /// Evaluate every candidate drug against `profile`, in table order.
    ///
    /// Side-effect-free and idempotent: the same profile always produces the
    /// same list.
    fn evaluate(&self, profile: &PatientProfile) -> Vec<DrugRecommendation>;

    /// The candidate drug ids this engine evaluates, in table order.
    fn candidate_drugs(&self) -> Vec<DrugId>;
}

/// The verifier: the gate between the engine and the physician, and between
/// the physician and the decision log.
pub trait Verifier: Send + Sync {
    /// Check a freshly evaluated list against the output invariants.
    ///
    /// `expected` lists every drug the list must cover exactly once.
    fn verify_recommendations(
        &self,
        recommendations: &[DrugRecommendation],
        expected: &[DrugId],
    ) -> GlyeralResult<VerificationReport>;

    /// Fill in the fields a physician left blank before the request is checked.
    ///
    /// The default returns the request unchanged; `verify_modification` then
    /// sees the blanks.
    fn complete_modification(
        &self,
        _recommendation: &DrugRecommendation,
        request: ModificationRequest,
    ) -> ModificationRequest {
        request
    }

    /// Check a physician's modification of `recommendation` before it is recorded.
    fn verify_modification(
        &self,
        recommendation: &DrugRecommendation,
        request: &ModificationRequest,
    ) -> GlyeralResult<VerificationReport>;
}

/// The decision recorder: the immutable record of physician actions.
///
/// A failed write means the action did not happen; the review session
/// surfaces `GlyeralError::AuditWriteFailed` and keeps its previous state.
pub trait DecisionRecorder: Send + Sync {
    /// Append one decision record. Records are never modified or deleted.
    fn record(&self, record: &DecisionRecord) -> GlyeralResult<()>;

    /// Mark a review session as complete. Implementations may seal the log here.
    fn finalize(&self, session_id: &str) -> GlyeralResult<()>;
}
