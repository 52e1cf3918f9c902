//! periop-audit
//!
//! Structured audit trail for changes to patient records.

pub mod events;

pub use events::{AuditAction, AuditEvent};
