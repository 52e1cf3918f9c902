use periop_audit::{AuditAction, AuditEvent};
use uuid::Uuid;

#[test]
fn builder_sets_resource_and_details() {
    let patient = Uuid::new_v4();
    let event = AuditEvent::new(AuditAction::ScaleSaved, patient, "dr.ivanova")
        .on("mmse_t0")
        .with_details(serde_json::json!({ "total_score": 27 }));

    assert_eq!(event.patient_id, patient);
    assert_eq!(event.resource.as_deref(), Some("mmse_t0"));
    assert_eq!(event.actor, "dr.ivanova");
    event.emit();
}

#[test]
fn serializes_with_snake_case_action() {
    let event = AuditEvent::new(AuditAction::SliceCleared, Uuid::nil(), "local").on("T4");
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "slice_cleared");
    assert_eq!(json["resource"], "T4");
    assert_eq!(json["details"], serde_json::Value::Null);
    assert_eq!(AuditAction::PatientRemoved.to_string(), "patient_removed");
}
