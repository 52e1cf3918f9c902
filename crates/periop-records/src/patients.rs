use jiff::Timestamp;
use periop_audit::AuditAction;
use periop_core::keys;
use periop_core::models::patient::{NewPatient, Patient, PatientQuery, PatientUpdate};
use periop_storage::state::{load_state, try_load_state};
use periop_storage::{Batch, Store};
use uuid::Uuid;

use crate::Records;
use crate::error::{Missing, RecordError};

impl<S: Store> Records<S> {
    pub fn register_patient(&self, new: NewPatient) -> Result<Patient, RecordError> {
        new.validate()?;
        let patient = new.into_patient(Uuid::new_v4(), Timestamp::now());

        let mut batch = Batch::new();
        batch.put_json(keys::patient(patient.id), &patient)?;
        self.store.commit(batch)?;

        tracing::info!(patient_id = %patient.id, "Patient registered");
        self.audit(AuditAction::PatientRegistered, patient.id)
            .with_details(serde_json::json!({
                "card_number": patient.card_number,
                "inclusion_date": patient.inclusion_date.to_string(),
            }))
            .emit();
        Ok(patient)
    }

    pub fn patient(&self, id: Uuid) -> Result<Patient, RecordError> {
        try_load_state(&self.store, &keys::patient(id))?
            .ok_or(RecordError::NotFound(Missing::Patient(id)))
    }

    /// All registered patients, ordered by name.
    pub fn patients(&self) -> Result<Vec<Patient>, RecordError> {
        let mut patients = self
            .store
            .list(keys::PATIENTS_PREFIX)?
            .iter()
            .map(|key| load_state::<Patient, _>(&self.store, key))
            .collect::<Result<Vec<_>, _>>()?;
        patients.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.created_at)
                .cmp(&(&b.last_name, &b.first_name, b.created_at))
        });
        Ok(patients)
    }

    /// Apply a partial update. An empty update returns the stored patient
    /// without writing.
    pub fn update_patient(&self, id: Uuid, update: PatientUpdate) -> Result<Patient, RecordError> {
        let current = self.patient(id)?;
        if update.is_empty() {
            return Ok(current);
        }

        let fields = update.changed_fields();
        let patient = update.apply(&current, Timestamp::now())?;

        let mut batch = Batch::new();
        batch.put_json(keys::patient(id), &patient)?;
        self.store.commit(batch)?;

        tracing::info!(patient_id = %id, fields = ?fields, "Patient updated");
        self.audit(AuditAction::PatientUpdated, id)
            .with_details(serde_json::json!({ "fields": fields }))
            .emit();
        Ok(patient)
    }

    /// Patients matching every filter in `query`, ordered by name, then
    /// paged by `offset` and `limit`.
    pub fn search_patients(&self, query: &PatientQuery) -> Result<Vec<Patient>, RecordError> {
        Ok(self
            .patients()?
            .into_iter()
            .filter(|patient| query.matches(patient))
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    /// Remove a patient together with every record filed under them.
    /// Returns `false` if the patient did not exist.
    pub fn remove_patient(&self, id: Uuid) -> Result<bool, RecordError> {
        let patient_key = keys::patient(id);
        if !self.store.exists(&patient_key)? {
            return Ok(false);
        }

        let records = self.store.list(&keys::patient_records_prefix(id))?;
        let mut batch = Batch::new();
        for key in &records {
            batch.delete(key.as_str())?;
        }
        batch.delete(patient_key)?;
        self.store.commit(batch)?;

        tracing::info!(patient_id = %id, records = records.len(), "Patient removed");
        self.audit(AuditAction::PatientRemoved, id)
            .with_details(serde_json::json!({ "records_removed": records.len() }))
            .emit();
        Ok(true)
    }
}
