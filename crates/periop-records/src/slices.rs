use jiff::Timestamp;
use periop_audit::AuditAction;
use periop_core::models::slice::SliceRecord;
use periop_core::models::status::SliceStatus;
use periop_core::models::timepoint::Timepoint;
use periop_scales::scoring::{Checks, ScoreRange, ValidationError};
use periop_storage::Store;
use uuid::Uuid;

use crate::Records;
use crate::coordination::{self, Stored};
use crate::error::RecordError;

const PERCENT: ScoreRange = ScoreRange::new(0.0, 100.0);
const NON_NEGATIVE: ScoreRange = ScoreRange::new(0.0, 1.0e6);
const PAIN_NRS: ScoreRange = ScoreRange::new(0.0, 10.0);

/// Range checks for the measurements in one slice.
pub fn validate_slice(record: &SliceRecord) -> Vec<ValidationError> {
    let mut checks = Checks::new("slice");

    let vitals = &record.vitals;
    checks
        .optional_range("vitals.spo2", vitals.spo2, PERCENT)
        .optional_range("vitals.respiratory_rate", vitals.respiratory_rate, NON_NEGATIVE)
        .optional_range(
            "vitals.urine_ml_per_hour",
            vitals.urine_ml_per_hour,
            NON_NEGATIVE,
        );
    for (field, value) in [
        ("vitals.heart_rate", vitals.heart_rate),
        ("vitals.heart_rate_min", vitals.heart_rate_min),
        ("vitals.heart_rate_max", vitals.heart_rate_max),
        ("vitals.systolic_bp", vitals.systolic_bp),
        ("vitals.systolic_bp_min", vitals.systolic_bp_min),
        ("vitals.systolic_bp_max", vitals.systolic_bp_max),
        ("vitals.diastolic_bp", vitals.diastolic_bp),
        ("vitals.diastolic_bp_min", vitals.diastolic_bp_min),
        ("vitals.diastolic_bp_max", vitals.diastolic_bp_max),
        ("vitals.mean_arterial_pressure", vitals.mean_arterial_pressure),
        ("vitals.mean_arterial_pressure_min", vitals.mean_arterial_pressure_min),
        ("vitals.mean_arterial_pressure_max", vitals.mean_arterial_pressure_max),
    ] {
        checks.optional_range(field, value, NON_NEGATIVE);
    }

    if let Some(hemodynamics) = &record.hemodynamics {
        checks.optional_range("hemodynamics.fio2", hemodynamics.fio2, PERCENT);
    }
    if let Some(blood_gas) = &record.blood_gas {
        checks
            .optional_range("blood_gas.sao2", blood_gas.sao2, PERCENT)
            .optional_range("blood_gas.pao2", blood_gas.pao2, NON_NEGATIVE)
            .optional_range("blood_gas.paco2", blood_gas.paco2, NON_NEGATIVE)
            .optional_range("blood_gas.lactate", blood_gas.lactate, NON_NEGATIVE);
    }
    if let Some(labs) = &record.labs {
        checks
            .optional_range("labs.hematocrit", labs.hematocrit, PERCENT)
            .optional_range("labs.hemoglobin", labs.hemoglobin, NON_NEGATIVE)
            .optional_range("labs.creatinine", labs.creatinine, NON_NEGATIVE);
    }
    if let Some(intraop) = &record.intraop {
        checks
            .optional_range("intraop.operation_min", intraop.operation_min, NON_NEGATIVE)
            .optional_range(
                "intraop.infusion_volume_ml",
                intraop.infusion_volume_ml,
                NON_NEGATIVE,
            );
    }

    let recovery = &record.recovery;
    checks
        .optional_range("recovery.pain_nrs", recovery.pain_nrs, PAIN_NRS)
        .optional_range("recovery.pain_nrs_min", recovery.pain_nrs_min, PAIN_NRS)
        .optional_range("recovery.pain_nrs_max", recovery.pain_nrs_max, PAIN_NRS)
        .optional_range(
            "recovery.urinary_catheter_pain",
            recovery.urinary_catheter_pain,
            PAIN_NRS,
        )
        .optional_range(
            "recovery.aldrete_score",
            recovery.aldrete_score,
            ScoreRange::new(0.0, 10.0),
        )
        .optional_range("recovery.qor15", recovery.qor15, ScoreRange::new(0.0, 150.0));

    checks.finish()
}

impl<S: Store> Records<S> {
    pub fn save_slice(
        &self,
        patient_id: Uuid,
        timepoint: Timepoint,
        record: &SliceRecord,
    ) -> Result<Stored<SliceRecord>, RecordError> {
        let stored = coordination::upsert::<SliceStatus, SliceRecord, _, _>(
            &self.store,
            patient_id,
            timepoint,
            Timestamp::now(),
            |_prior| {
                let errors = validate_slice(record);
                if errors.is_empty() {
                    Ok(record.clone())
                } else {
                    Err(RecordError::InvalidSlice { timepoint, errors })
                }
            },
        )?;

        tracing::info!(%patient_id, %timepoint, "Slice saved");
        self.audit(AuditAction::SliceSaved, patient_id)
            .on(timepoint.to_string())
            .emit();
        Ok(stored)
    }

    pub fn slice(
        &self,
        patient_id: Uuid,
        timepoint: Timepoint,
    ) -> Result<Stored<SliceRecord>, RecordError> {
        coordination::fetch::<SliceStatus, _, _>(&self.store, patient_id, timepoint)
    }

    /// Returns `false` if there was no slice to clear.
    pub fn clear_slice(
        &self,
        patient_id: Uuid,
        timepoint: Timepoint,
    ) -> Result<bool, RecordError> {
        let cleared = coordination::clear::<SliceStatus, _>(
            &self.store,
            patient_id,
            timepoint,
            Timestamp::now(),
        )?;
        if cleared {
            tracing::info!(%patient_id, %timepoint, "Slice cleared");
            self.audit(AuditAction::SliceCleared, patient_id)
                .on(timepoint.to_string())
                .emit();
        }
        Ok(cleared)
    }
}
