//! Physiological measurements captured at a perioperative timepoint.
//!
//! Which groups are populated depends on the timepoint: spirometry at the
//! pre-operative baseline, haemodynamics and blood gases intra-operatively,
//! recovery fields after surgery. Every measurement is optional.

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct SliceRecord {
    pub date: Option<Date>,
    pub time: Option<Time>,
    pub vitals: VitalSigns,
    pub spirometry: Option<Spirometry>,
    pub hemodynamics: Option<Hemodynamics>,
    pub blood_gas: Option<BloodGas>,
    pub labs: Option<LabPanel>,
    pub regional_block: Option<RegionalBlock>,
    pub intraop: Option<IntraopTimings>,
    pub recovery: Recovery,
    pub complications: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct VitalSigns {
    /// Spontaneous respiratory rate, breaths/min.
    pub respiratory_rate: Option<f64>,
    pub heart_rate: Option<f64>,
    pub heart_rate_min: Option<f64>,
    pub heart_rate_max: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub systolic_bp_min: Option<f64>,
    pub systolic_bp_max: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub diastolic_bp_min: Option<f64>,
    pub diastolic_bp_max: Option<f64>,
    pub mean_arterial_pressure: Option<f64>,
    pub mean_arterial_pressure_min: Option<f64>,
    pub mean_arterial_pressure_max: Option<f64>,
    pub spo2: Option<f64>,
    pub urine_ml_per_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Spirometry {
    pub fev1: Option<f64>,
    pub fvc: Option<f64>,
    pub frc: Option<f64>,
    pub tlc: Option<f64>,
    pub rv: Option<f64>,
    pub fev1_fvc: Option<f64>,
    pub pef: Option<f64>,
    pub mef25: Option<f64>,
    pub mef50: Option<f64>,
    pub mef75: Option<f64>,
    pub fef25_75: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Hemodynamics {
    pub stroke_volume: Option<f64>,
    pub cardiac_index: Option<f64>,
    /// Systemic vascular resistance index.
    pub svri: Option<f64>,
    /// Arterial oxygen content.
    pub cao2: Option<f64>,
    /// Oxygen delivery.
    pub do2: Option<f64>,
    pub central_venous_pressure: Option<f64>,
    /// Inspired oxygen fraction, percent.
    pub fio2: Option<f64>,
    pub lung_ultrasound_score: Option<f64>,
    pub mac: Option<f64>,
    pub qcon: Option<f64>,
    pub qnox: Option<f64>,
    pub emg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct BloodGas {
    pub ph: Option<f64>,
    pub base_excess: Option<f64>,
    pub hco3: Option<f64>,
    pub lactate: Option<f64>,
    pub pao2: Option<f64>,
    pub pao2_fio2: Option<f64>,
    pub paco2: Option<f64>,
    pub sao2: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct LabPanel {
    pub hemoglobin: Option<f64>,
    pub hematocrit: Option<f64>,
    pub leukocytes: Option<f64>,
    pub neutrophils: Option<f64>,
    pub lymphocytes: Option<f64>,
    pub band_neutrophils: Option<f64>,
    pub albumin: Option<f64>,
    pub creatinine: Option<f64>,
    pub gfr: Option<f64>,
    /// Neutrophil-to-lymphocyte ratio.
    pub nlr: Option<f64>,
    pub glucose: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct RegionalBlock {
    pub pin_prick: Option<bool>,
    pub cold_test: Option<bool>,
    pub motor_block: Option<bool>,
}

/// Intra-operative durations in minutes and infused volume in ml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct IntraopTimings {
    pub operation_min: Option<f64>,
    pub awakening_min: Option<f64>,
    pub until_extubation_min: Option<f64>,
    pub infusion_volume_ml: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Recovery {
    pub pulmonary_complications: Option<bool>,
    pub phrenic_nerve_palsy: Option<bool>,
    pub diaphragm_dysfunction: Option<bool>,
    pub acute_kidney_injury: Option<bool>,
    pub pain_nrs: Option<f64>,
    pub pain_nrs_min: Option<f64>,
    pub pain_nrs_max: Option<f64>,
    pub nausea_vomiting: Option<bool>,
    pub aldrete_score: Option<f64>,
    pub aldrete_time_min: Option<f64>,
    pub hours_to_activation: Option<f64>,
    pub hours_to_peristalsis: Option<f64>,
    pub hours_to_first_flatus: Option<f64>,
    pub opioid_consumption_mg: Option<f64>,
    pub urinary_catheter_pain: Option<f64>,
    pub hours_in_icu: Option<f64>,
    pub hours_of_intense_pain: Option<f64>,
    pub hours_to_restore_frc: Option<f64>,
    pub hours_to_restore_gfr: Option<f64>,
    pub days_in_ward: Option<f64>,
    pub qor15: Option<f64>,
    pub satisfied: Option<bool>,
}
