use std::fmt;

use serde::Serialize;
use tracing::{Level, event};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    PatientRegistered,
    PatientUpdated,
    PatientRemoved,
    ScaleSaved,
    ScaleCleared,
    SliceSaved,
    SliceCleared,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::PatientRegistered => "patient_registered",
            AuditAction::PatientUpdated => "patient_updated",
            AuditAction::PatientRemoved => "patient_removed",
            AuditAction::ScaleSaved => "scale_saved",
            AuditAction::ScaleCleared => "scale_cleared",
            AuditAction::SliceSaved => "slice_saved",
            AuditAction::SliceCleared => "slice_cleared",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured audit event for a change to a patient record.
///
/// Events are logged via `tracing` under the `audit` target so they can be
/// routed to a separate sink by the subscriber's filter.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub patient_id: Uuid,
    /// What was touched inside the patient record, e.g. `mmse_t10` or `T3`.
    pub resource: Option<String>,
    pub actor: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: AuditAction, patient_id: Uuid, actor: impl Into<String>) -> Self {
        Self {
            action,
            patient_id,
            resource: None,
            actor: actor.into(),
            details: None,
        }
    }

    pub fn on(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        event!(
            target: "audit",
            Level::INFO,
            audit.action = %self.action,
            audit.patient_id = %self.patient_id,
            audit.resource = self.resource.as_deref().unwrap_or(""),
            audit.actor = %self.actor,
            audit.details = %details,
            "audit event"
        );
    }
}
