//! Runtime error types for the GLYERAL recommendation runtime.
//!
//! All fallible operations return `GlyeralResult<T>`. Nothing here is fatal
//! to a review: every variant is either a user-correctable rejection or a
//! configuration problem surfaced at startup. Rule evaluation itself never
//! fails.

use thiserror::Error;

/// The unified error type for the GLYERAL runtime.
#[derive(Debug, Error)]
pub enum GlyeralError {
    /// A physician action failed boundary validation and was not recorded.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// A review action named a drug that is not in the current recommendation list.
    #[error("no recommendation for drug '{drug_id}' in the current review")]
    RecommendationNotFound { drug_id: String },

    /// A blocked recommendation cannot be accepted or modified into a prescription.
    #[error("recommendation for '{drug_id}' is blocked: {reason}")]
    RecommendationBlocked { drug_id: String, reason: String },

    /// A review action was attempted before any recommendations were generated.
    #[error("no recommendations have been generated for this review")]
    NoRecommendations,

    /// The verifier rejected the engine's output before it was shown.
    #[error("recommendation verification failed: {reason}")]
    VerificationFailed { reason: String },

    /// The decision recorder could not persist a record.
    ///
    /// The action is not considered taken when this is returned.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A configuration document is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A JSON Schema document could not be compiled or applied.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

/// Convenience alias used throughout the GLYERAL crates.
pub type GlyeralResult<T> = Result<T, GlyeralError>;
