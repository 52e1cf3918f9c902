mod common;

use common::{new_patient, records, registered, stop_bang_input};
use periop_core::keys;
use periop_core::models::patient::{PatientQuery, PatientUpdate};
use periop_core::models::slice::SliceRecord;
use periop_core::models::timepoint::Timepoint;
use periop_records::{Missing, RecordError, Records};
use periop_scales::scales::stop_bang::StopBang;
use periop_storage::{SqliteStore, Store};
use uuid::Uuid;

#[test]
fn registered_patient_reads_back() {
    let records = records();
    let patient = registered(&records);

    let loaded = records.patient(patient.id).unwrap();
    assert_eq!(loaded.full_name(), "Sokolov Pavel Olegovich");
    assert_eq!(loaded.age_years(), 66);
    assert_eq!(loaded.card_number.as_deref(), Some("C-2207"));
}

#[test]
fn registration_rejects_invalid_payload() {
    let records = records();
    let mut payload = new_patient("Sokolov");
    payload.first_name = "  ".to_string();

    let err = records.register_patient(payload).unwrap_err();
    assert!(matches!(err, RecordError::Core(_)));
    assert!(records.patients().unwrap().is_empty());
}

#[test]
fn unknown_patient_is_not_found() {
    let records = records();
    let id = Uuid::new_v4();
    let err = records.patient(id).unwrap_err();
    assert!(matches!(err, RecordError::NotFound(Missing::Patient(missing)) if missing == id));
}

#[test]
fn patients_are_listed_by_name() {
    let records = records();
    records.register_patient(new_patient("Zaitsev")).unwrap();
    records.register_patient(new_patient("Antonov")).unwrap();
    records.register_patient(new_patient("Morozov")).unwrap();

    let names: Vec<String> = records
        .patients()
        .unwrap()
        .into_iter()
        .map(|p| p.last_name)
        .collect();
    assert_eq!(names, ["Antonov", "Morozov", "Zaitsev"]);
}

#[test]
fn removing_a_patient_drops_all_records() {
    let records = records();
    let patient = registered(&records);
    let other = records.register_patient(new_patient("Belov")).unwrap();

    records
        .save_scale(&StopBang, patient.id, None, &stop_bang_input())
        .unwrap();
    records
        .save_slice(patient.id, Timepoint::BASELINE, &SliceRecord::default())
        .unwrap();
    records
        .save_scale(&StopBang, other.id, None, &stop_bang_input())
        .unwrap();

    assert!(records.remove_patient(patient.id).unwrap());
    assert!(
        records
            .store()
            .list(&keys::patient_records_prefix(patient.id))
            .unwrap()
            .is_empty()
    );
    assert!(records.patient(patient.id).unwrap_err().is_not_found());

    // The other patient is untouched.
    assert!(records.scale_result(&StopBang, other.id, None).is_ok());
    assert!(!records.remove_patient(patient.id).unwrap());
}

#[test]
fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let records = Records::new(SqliteStore::open_dir(dir.path()).unwrap(), "tester");
        let patient = registered(&records);
        records
            .save_scale(&StopBang, patient.id, None, &stop_bang_input())
            .unwrap();
        patient.id
    };

    let records = Records::new(SqliteStore::open_dir(dir.path()).unwrap(), "tester");
    assert_eq!(records.patients().unwrap().len(), 1);
    let stored = records.scale_result(&StopBang, id, None).unwrap();
    assert_eq!(stored.patient_id, id);
    assert_eq!(stored.data.input, stop_bang_input());
}

#[test]
fn update_changes_selected_fields_only() {
    let records = records();
    let patient = registered(&records);

    let update = PatientUpdate {
        weight_kg: Some(88),
        patronymic: Some(String::new()),
        ..PatientUpdate::default()
    };
    let updated = records.update_patient(patient.id, update).unwrap();
    assert_eq!(updated.weight_kg, 88);
    assert_eq!(updated.patronymic, None);
    assert_eq!(updated.height_cm, 178);
    assert_eq!(updated.created_at, patient.created_at);
    assert!(updated.updated_at >= patient.updated_at);

    let loaded = records.patient(patient.id).unwrap();
    assert_eq!(loaded.weight_kg, 88);
    assert_eq!(loaded.full_name(), "Sokolov Pavel");
}

#[test]
fn invalid_update_is_not_stored() {
    let records = records();
    let patient = registered(&records);

    let update = PatientUpdate {
        height_cm: Some(400),
        ..PatientUpdate::default()
    };
    let err = records.update_patient(patient.id, update).unwrap_err();
    assert!(matches!(err, RecordError::Core(_)));
    assert_eq!(records.patient(patient.id).unwrap().height_cm, 178);
}

#[test]
fn update_of_unknown_patient_is_not_found() {
    let records = records();
    let err = records
        .update_patient(Uuid::new_v4(), PatientUpdate::default())
        .unwrap_err();
    assert!(matches!(err, RecordError::NotFound(Missing::Patient(_))));
}

#[test]
fn search_filters_and_pages_by_name() {
    let records = records();
    records.register_patient(new_patient("Zaitsev")).unwrap();
    records.register_patient(new_patient("Antonov")).unwrap();
    let mut other = new_patient("Antipov");
    other.card_number = Some("B-0311".to_string());
    other.birth_date = jiff::civil::date(1990, 1, 1);
    records.register_patient(other).unwrap();

    let names = |query: PatientQuery| -> Vec<String> {
        records
            .search_patients(&query)
            .unwrap()
            .into_iter()
            .map(|p| p.last_name)
            .collect()
    };

    assert_eq!(names(PatientQuery::default()), ["Antipov", "Antonov", "Zaitsev"]);
    assert_eq!(
        names(PatientQuery {
            last_name: Some("ANT".to_string()),
            ..PatientQuery::default()
        }),
        ["Antipov", "Antonov"]
    );
    assert_eq!(
        names(PatientQuery {
            card_number: Some("2207".to_string()),
            ..PatientQuery::default()
        }),
        ["Antonov", "Zaitsev"]
    );
    // Born 1990, included 2024-09-10.
    assert_eq!(
        names(PatientQuery {
            age: Some(34),
            ..PatientQuery::default()
        }),
        ["Antipov"]
    );
    assert_eq!(
        names(PatientQuery {
            offset: 1,
            limit: 1,
            ..PatientQuery::default()
        }),
        ["Antonov"]
    );
    assert!(
        names(PatientQuery {
            inclusion_date: Some(jiff::civil::date(2024, 1, 1)),
            ..PatientQuery::default()
        })
        .is_empty()
    );
}
