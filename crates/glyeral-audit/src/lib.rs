//! # glyeral-audit
//!
//! Append-only, SHA-256 hash-chained decision log for GLYERAL.
//!
//! ## Overview
//!
//! Every physician decision is wrapped in an `AuditEvent` that links to the
//! previous event via its SHA-256 hash. Altering any stored decision breaks
//! the chain and is detected by `verify_chain`. `trail` turns the chain into
//! the rows of the compliance view.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use glyeral_audit::InMemoryDecisionLog;
//! use glyeral_core::traits::DecisionRecorder;
//!
//! let log = InMemoryDecisionLog::new("clinic-2024-12");
//! log.record(&decision)?;
//! log.finalize(&session_id)?;
//!
//! assert!(log.verify_integrity());
//! ```

pub mod chain;
pub mod event;
pub mod memory;
pub mod trail;

pub use chain::{first_broken_link, hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemoryDecisionLog;
pub use trail::{trail_entries, AuditTrailEntry, TrailFilter, TrailStatus};

// ── Tests ─────────────────────────────────────────────────────────────────────
