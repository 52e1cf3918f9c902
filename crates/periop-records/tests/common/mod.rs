#![allow(dead_code)]

use jiff::civil::date;
use periop_core::models::patient::{NewPatient, Patient, Sex};
use periop_records::Records;
use periop_scales::scales::el_ganzouri::{ElGanzouriInput, IntubationHistory};
use periop_scales::scales::stop_bang::StopBangInput;
use periop_storage::{SqliteStore, Store};

pub fn new_patient(last_name: &str) -> NewPatient {
    NewPatient {
        card_number: Some("C-2207".to_string()),
        last_name: last_name.to_string(),
        first_name: "Pavel".to_string(),
        patronymic: Some("Olegovich".to_string()),
        birth_date: date(1958, 3, 2),
        inclusion_date: date(2024, 9, 10),
        height_cm: 178,
        weight_kg: 96,
        sex: Sex::Male,
        anesthesia_type: None,
    }
}

pub fn records() -> Records<SqliteStore> {
    Records::new(SqliteStore::open_in_memory().unwrap(), "tester")
}

pub fn registered<S: Store>(records: &Records<S>) -> Patient {
    records.register_patient(new_patient("Sokolov")).unwrap()
}

pub fn stop_bang_input() -> StopBangInput {
    StopBangInput {
        snoring: true,
        tired: true,
        observed_apnea: false,
        hypertension: true,
        bmi: 36.0,
        age_years: 55,
        neck_circumference_cm: 42.0,
        male: true,
    }
}

pub fn airway_input() -> ElGanzouriInput {
    ElGanzouriInput {
        interincisor_gap_cm: 4.5,
        thyromental_distance_cm: 7.0,
        mallampati_class: 1,
        neck_extension_deg: 95.0,
        can_protrude_mandible: true,
        weight_kg: 70.0,
        difficult_intubation_history: IntubationHistory::None,
    }
}
