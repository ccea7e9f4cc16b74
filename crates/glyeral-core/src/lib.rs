//! # glyeral-core
//!
//! The review runtime for GLYERAL medication recommendations.
//!
//! This crate provides:
//! - The three seams (`RecommendationEngine`, `Verifier`, `DecisionRecorder`)
//! - The `ReviewSession` that wires them together for one patient review
//! - `ClinicianSession`, the explicit session-scoped UI state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use glyeral_core::{ReviewSession, traits::{RecommendationEngine, Verifier, DecisionRecorder}};
//! ```

pub mod review;
pub mod session;
pub mod traits;

pub use review::ReviewSession;
pub use session::{ClinicianSession, IntakeStep};
