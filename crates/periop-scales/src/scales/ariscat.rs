use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{Band, BandTable, Checks, ScoreRange, UpperBound, ValidationError};
use crate::{Descriptor, Scale};

/// ARISCAT: risk of postoperative pulmonary complications.
/// Seven predictors, total 0–123.
pub struct Ariscat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AriscatAge {
    #[serde(rename = "le_50")]
    UpTo50,
    #[serde(rename = "bw_51_80")]
    From51To80,
    #[serde(rename = "gt_80")]
    Over80,
}

impl Band for AriscatAge {
    fn points(self) -> u32 {
        match self {
            AriscatAge::UpTo50 => 0,
            AriscatAge::From51To80 => 3,
            AriscatAge::Over80 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AriscatSpo2 {
    #[serde(rename = "le_90")]
    AtMost90,
    #[serde(rename = "bw_91_95")]
    From91To95,
    #[serde(rename = "ge_96")]
    AtLeast96,
}

impl Band for AriscatSpo2 {
    fn points(self) -> u32 {
        match self {
            AriscatSpo2::AtLeast96 => 0,
            AriscatSpo2::From91To95 => 8,
            AriscatSpo2::AtMost90 => 24,
        }
    }
}

/// Surgical incision site. Acts as its own band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Incision {
    Peripheral,
    UpperAbdominal,
    Intrathoracic,
}

impl Band for Incision {
    fn points(self) -> u32 {
        match self {
            Incision::Peripheral => 0,
            Incision::UpperAbdominal => 15,
            Incision::Intrathoracic => 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AriscatDuration {
    #[serde(rename = "lt_2h")]
    Under2h,
    #[serde(rename = "bw_2_3h")]
    From2To3h,
    #[serde(rename = "gt_3h")]
    Over3h,
}

impl Band for AriscatDuration {
    fn points(self) -> u32 {
        match self {
            AriscatDuration::Under2h => 0,
            AriscatDuration::From2To3h => 16,
            AriscatDuration::Over3h => 23,
        }
    }
}

const AGE_BANDS: BandTable<u16, AriscatAge> = BandTable::new(
    &[
        (UpperBound::AtMost(50), AriscatAge::UpTo50),
        (UpperBound::AtMost(80), AriscatAge::From51To80),
    ],
    AriscatAge::Over80,
);

const SPO2_BANDS: BandTable<u8, AriscatSpo2> = BandTable::new(
    &[
        (UpperBound::AtMost(90), AriscatSpo2::AtMost90),
        (UpperBound::AtMost(95), AriscatSpo2::From91To95),
    ],
    AriscatSpo2::AtLeast96,
);

const DURATION_BANDS: BandTable<u16, AriscatDuration> = BandTable::new(
    &[
        (UpperBound::Below(120), AriscatDuration::Under2h),
        (UpperBound::AtMost(180), AriscatDuration::From2To3h),
    ],
    AriscatDuration::Over3h,
);

const RESPIRATORY_INFECTION_POINTS: u32 = 17;
const ANEMIA_POINTS: u32 = 11;
const EMERGENCY_POINTS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AriscatInput {
    pub age_years: u16,
    pub spo2_percent: u8,
    /// Respiratory infection within the last month.
    pub respiratory_infection: bool,
    /// Preoperative hemoglobin at or below 100 g/L.
    pub anemia: bool,
    pub incision: Incision,
    pub duration_minutes: u16,
    pub emergency: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AriscatResult {
    pub input: AriscatInput,
    pub age_band: AriscatAge,
    pub spo2_band: AriscatSpo2,
    pub incision: Incision,
    pub duration_band: AriscatDuration,
    pub total_score: u32,
}

impl Descriptor for Ariscat {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Ariscat
    }

    fn name(&self) -> &str {
        "ARISCAT"
    }

    fn description(&self) -> &str {
        "Postoperative pulmonary complication risk. <26 low, 26-44 intermediate, 45+ high"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 123.0, 1.0))
    }
}

impl Scale for Ariscat {
    type Input = AriscatInput;
    type Output = AriscatResult;

    fn validate(&self, input: &AriscatInput) -> Vec<ValidationError> {
        let mut checks = Checks::new(self.id());
        checks
            .range("age_years", f64::from(input.age_years), ScoreRange::new(0.0, 130.0))
            .range(
                "spo2_percent",
                f64::from(input.spo2_percent),
                ScoreRange::new(50.0, 100.0),
            )
            .range(
                "duration_minutes",
                f64::from(input.duration_minutes),
                ScoreRange::new(0.0, 1440.0),
            );
        checks.finish()
    }

    fn compute(&self, input: &AriscatInput, _prior: Option<&AriscatResult>) -> AriscatResult {
        let age_band = AGE_BANDS.classify(input.age_years);
        let spo2_band = SPO2_BANDS.classify(input.spo2_percent);
        let duration_band = DURATION_BANDS.classify(input.duration_minutes);

        let mut total_score = age_band.points()
            + spo2_band.points()
            + input.incision.points()
            + duration_band.points();
        if input.respiratory_infection {
            total_score += RESPIRATORY_INFECTION_POINTS;
        }
        if input.anemia {
            total_score += ANEMIA_POINTS;
        }
        if input.emergency {
            total_score += EMERGENCY_POINTS;
        }

        AriscatResult {
            input: input.clone(),
            age_band,
            spo2_band,
            incision: input.incision,
            duration_band,
            total_score,
        }
    }
}
