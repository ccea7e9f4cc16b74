//! Verification report types.
//!
//! Before a recommendation list is shown, and before a modification is
//! recorded, the verifier produces a `VerificationReport`. Only a passing
//! report lets the review proceed.

use serde::{Deserialize, Serialize};

/// The result of running every check against one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if all checks passed.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// Build a report from collected failures.
    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    /// Join all failures as `"[check] message; …"` for error messages.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.check_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single failed check within a `VerificationReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Identifier of the check that failed, e.g. "blocked-warning-first".
    pub check_id: String,
    /// Human-readable explanation.
    pub message: String,
}

impl VerificationFailure {
    pub fn new(check_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check_id: check_id.into(),
            message: message.into(),
        }
    }
}
