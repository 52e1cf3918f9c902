//! periop-records
//!
//! Per-patient record keeping on top of a [`Store`]: the patient registry,
//! scale results, physiological slices, status aggregates and summaries.
//! Every mutation commits one atomic batch and emits an audit event.

pub mod coordination;
pub mod error;
pub mod patients;
pub mod scales;
pub mod slices;
pub mod status;
pub mod summary;

use periop_audit::{AuditAction, AuditEvent};
use periop_storage::Store;
use uuid::Uuid;

pub use coordination::{Aggregate, Stored};
pub use error::{Missing, RecordError};

/// Entry point for reading and writing patient records.
pub struct Records<S> {
    store: S,
    actor: String,
}

impl<S: Store> Records<S> {
    /// `actor` is recorded on every audit event.
    pub fn new(store: S, actor: impl Into<String>) -> Self {
        Self {
            store,
            actor: actor.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn audit(&self, action: AuditAction, patient_id: Uuid) -> AuditEvent {
        AuditEvent::new(action, patient_id, self.actor.as_str())
    }
}
