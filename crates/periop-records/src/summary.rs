use periop_core::models::status::{ScaleKey, ScaleKind};
use periop_core::models::timepoint::Timepoint;
use periop_scales::Scale;
use periop_scales::scales::{
    aldrete::Aldrete, ariscat::Ariscat, caprini::Caprini, el_ganzouri::ElGanzouri,
    las_vegas::LasVegas, lee_rcri::LeeRcri, mmse::Mmse, qor15::Qor15, soba::Soba,
    stop_bang::StopBang,
};
use periop_storage::Store;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::Records;
use crate::error::{Missing, RecordError};

/// One filled scale, reduced to a total and a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryRow {
    pub scale: ScaleKind,
    pub timepoint: Option<Timepoint>,
    pub total_score: Option<u32>,
    pub label: String,
}

/// A filled physiological slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SliceRow {
    pub timepoint: Timepoint,
    pub description: String,
}

impl From<Timepoint> for SliceRow {
    fn from(timepoint: Timepoint) -> Self {
        Self {
            timepoint,
            description: timepoint.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientSummary {
    pub patient_id: Uuid,
    pub full_name: String,
    pub age_years: i16,
    pub bmi: Option<f64>,
    pub scales: Vec<SummaryRow>,
    pub slices: Vec<SliceRow>,
}

/// ARISCAT pulmonary complication risk band.
pub fn ariscat_band(total: u32) -> &'static str {
    match total {
        0..=25 => "low",
        26..=44 => "intermediate",
        _ => "high",
    }
}

/// MMSE cognitive band.
pub fn mmse_band(total: u32) -> &'static str {
    match total {
        24.. => "normal",
        18..=23 => "mild impairment",
        _ => "severe impairment",
    }
}

impl<S: Store> Records<S> {
    /// Every stored scale result and slice for a patient. Scales without a
    /// stored result are left out.
    pub fn summary(&self, patient_id: Uuid) -> Result<PatientSummary, RecordError> {
        let patient = self.patient(patient_id)?;

        let filled: Vec<ScaleKey> = match self.scale_status(patient_id) {
            Ok(status) => status.filled.into_iter().collect(),
            Err(RecordError::NotFound(Missing::Aggregate { .. })) => Vec::new(),
            Err(e) => return Err(e),
        };
        let mut scales = Vec::with_capacity(filled.len());
        for key in filled {
            if let Some(row) = self.summary_row(patient_id, key)? {
                scales.push(row);
            }
        }

        let slices = match self.slice_status(patient_id) {
            Ok(status) => status.filled.into_iter().map(SliceRow::from).collect(),
            Err(RecordError::NotFound(Missing::Aggregate { .. })) => Vec::new(),
            Err(e) => return Err(e),
        };

        Ok(PatientSummary {
            patient_id,
            full_name: patient.full_name(),
            age_years: patient.age_years(),
            bmi: patient.bmi(),
            scales,
            slices,
        })
    }

    fn summary_row(
        &self,
        patient_id: Uuid,
        key: ScaleKey,
    ) -> Result<Option<SummaryRow>, RecordError> {
        let tp = key.timepoint;
        match key.kind {
            ScaleKind::ElGanzouri => self.row(&ElGanzouri, patient_id, tp, |r| {
                (Some(r.total_score), r.plan.label().to_string())
            }),
            ScaleKind::Ariscat => self.row(&Ariscat, patient_id, tp, |r| {
                (Some(r.total_score), ariscat_band(r.total_score).to_string())
            }),
            ScaleKind::StopBang => self.row(&StopBang, patient_id, tp, |r| {
                (Some(r.total_score), r.risk.label().to_string())
            }),
            ScaleKind::Soba => self.row(&Soba, patient_id, tp, |r| {
                (None, format!("{} red flags", r.red_flags.len()))
            }),
            ScaleKind::LeeRcri => self.row(&LeeRcri, patient_id, tp, |r| {
                (Some(r.total_score), r.risk_label())
            }),
            ScaleKind::Caprini => self.row(&Caprini, patient_id, tp, |r| {
                (Some(r.total_score), r.risk.label().to_string())
            }),
            ScaleKind::LasVegas => self.row(&LasVegas, patient_id, tp, |r| {
                (Some(r.total_score), r.risk.label().to_string())
            }),
            ScaleKind::Qor15 => self.row(&Qor15, patient_id, tp, |r| {
                (Some(r.total_score), format!("{}/150", r.total_score))
            }),
            ScaleKind::Aldrete => self.row(&Aldrete, patient_id, tp, |r| {
                (Some(r.total_score), format!("{}/10", r.total_score))
            }),
            ScaleKind::Mmse => self.row(&Mmse, patient_id, tp, |r| {
                (Some(r.total_score), mmse_band(r.total_score).to_string())
            }),
        }
    }

    fn row<K: Scale>(
        &self,
        scale: &K,
        patient_id: Uuid,
        timepoint: Option<Timepoint>,
        describe: impl FnOnce(&K::Output) -> (Option<u32>, String),
    ) -> Result<Option<SummaryRow>, RecordError> {
        let stored = match self.scale_result(scale, patient_id, timepoint) {
            Ok(stored) => stored,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let (total_score, label) = describe(&stored.data);
        Ok(Some(SummaryRow {
            scale: scale.kind(),
            timepoint,
            total_score,
            label,
        }))
    }
}
