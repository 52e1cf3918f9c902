//! Storage key conventions.
//!
//! Pure string functions with no I/O. These define the canonical layout of
//! records in whatever store backs the system.

use uuid::Uuid;

use crate::models::status::ScaleKey;
use crate::models::timepoint::Timepoint;

pub const PATIENTS_PREFIX: &str = "patients/";

pub fn patient(id: Uuid) -> String {
    format!("patients/{id}.json")
}

/// Everything recorded for one patient lives under this prefix.
pub fn patient_records_prefix(id: Uuid) -> String {
    format!("records/{id}/")
}

pub fn scale_status(id: Uuid) -> String {
    format!("records/{id}/scales/_status.json")
}

pub fn scale_result(id: Uuid, key: &ScaleKey) -> String {
    format!("records/{id}/scales/{}.json", key.slug())
}

pub fn slice_status(id: Uuid) -> String {
    format!("records/{id}/slices/_status.json")
}

pub fn slice(id: Uuid, timepoint: Timepoint) -> String {
    format!("records/{id}/slices/t{}.json", timepoint.index())
}
