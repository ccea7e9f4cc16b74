//! # glyeral-verify
//!
//! Verification for GLYERAL recommendation lists and physician modifications.
//!
//! This crate provides [`engine::RecommendationVerifier`], which implements the
//! [`glyeral_core::traits::Verifier`] trait. Recommendation lists are checked
//! in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: drug coverage and `BLOCKED:` warning placement.
//!
//! Modification requests must carry notes and a dosage, must not target a
//! blocked drug, and must pick from the formulary options when the drug has
//! a formulary entry.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use glyeral_rules::GlyeralConfig;
//! use glyeral_verify::RecommendationVerifier;
//!
//! let formulary = GlyeralConfig::standard()?.formulary();
//! let verifier = RecommendationVerifier::with_formulary(formulary);
//! ```

pub mod engine;

pub use engine::{recommendation_list_schema, RecommendationVerifier};
