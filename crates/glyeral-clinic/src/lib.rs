//! # glyeral-clinic
//!
//! Clinic reference runtime for the GLYERAL medication recommendation system.
//!
//! Demonstrates two clinical workflows using mock data:
//!
//! 1. **Patient Intake**: roster search, intake walk-through, evaluation of
//!    text-typed lab values, and the chat assistant's quick chips.
//! 2. **Physician Review**: accept, modify (with mandatory notes), and reject
//!    against a verified list, with every decision hash-chained into the
//!    decision log.
//!
//! All data is hardcoded and fictional. No external services are called.

pub mod assistant;
pub mod mock_data;
pub mod scenarios;
