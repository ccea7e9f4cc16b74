//! # glyeral-contracts
//!
//! Shared types and contracts for the GLYERAL recommendation runtime.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, wire formats, and error types.

pub mod decision;
pub mod error;
pub mod formulary;
pub mod profile;
pub mod recommendation;
pub mod verify;
