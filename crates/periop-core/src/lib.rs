//! periop-core
//!
//! Pure domain types and storage key conventions.
//! No scoring rules and no I/O. This is the shared vocabulary of the
//! perioperative assessment system.

pub mod error;
pub mod keys;
pub mod models;
