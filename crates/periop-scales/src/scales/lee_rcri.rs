use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{Checks, ScoreRange, ThresholdTable, ValidationError, points_of};
use crate::{Descriptor, Scale};

/// Lee Revised Cardiac Risk Index. Six predictors, total 0–6, mapped to an
/// estimated rate of major cardiac events.
pub struct LeeRcri;

const CREATININE_THRESHOLD_UMOL_L: f64 = 180.0;

const RISK_PERCENT: ThresholdTable<f64> =
    ThresholdTable::new(&[(3, 11.0), (2, 7.0), (1, 0.9)], 0.4);

/// Where the creatinine predictor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CreatinineSource {
    /// Raw laboratory value in µmol/L.
    Measured,
    /// Explicit yes/no from the clinician.
    Reported,
    /// Carried over from the previously stored result.
    Carried,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeeRcriInput {
    pub high_risk_surgery: bool,
    pub ischemic_heart_disease: bool,
    pub heart_failure: bool,
    pub cerebrovascular_disease: bool,
    pub insulin_therapy: bool,
    #[serde(default)]
    pub creatinine_umol_l: Option<f64>,
    #[serde(default)]
    pub creatinine_gt_180: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeeRcriResult {
    pub input: LeeRcriInput,
    pub creatinine_gt_180: bool,
    pub creatinine_source: CreatinineSource,
    pub total_score: u32,
    pub risk_percent: f64,
}

impl LeeRcriResult {
    /// Display label such as "≈7%".
    pub fn risk_label(&self) -> String {
        format!("≈{}%", self.risk_percent)
    }
}

impl Descriptor for LeeRcri {
    fn kind(&self) -> ScaleKind {
        ScaleKind::LeeRcri
    }

    fn name(&self) -> &str {
        "Lee RCRI"
    }

    fn description(&self) -> &str {
        "Major cardiac event risk. 0: 0.4%, 1: 0.9%, 2: 7%, 3+: 11%"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 6.0, 1.0))
    }
}

impl Scale for LeeRcri {
    type Input = LeeRcriInput;
    type Output = LeeRcriResult;

    fn validate(&self, input: &LeeRcriInput) -> Vec<ValidationError> {
        let mut checks = Checks::new(self.id());
        checks.optional_range(
            "creatinine_umol_l",
            input.creatinine_umol_l,
            ScoreRange::new(0.0, 2500.0),
        );
        checks.finish()
    }

    fn compute(&self, input: &LeeRcriInput, prior: Option<&LeeRcriResult>) -> LeeRcriResult {
        let (creatinine_gt_180, creatinine_source) =
            match (input.creatinine_umol_l, input.creatinine_gt_180, prior) {
                (Some(value), _, _) => (
                    value > CREATININE_THRESHOLD_UMOL_L,
                    CreatinineSource::Measured,
                ),
                (None, Some(flag), _) => (flag, CreatinineSource::Reported),
                (None, None, Some(prior)) => (prior.creatinine_gt_180, CreatinineSource::Carried),
                (None, None, None) => (false, CreatinineSource::Absent),
            };

        let total_score = points_of(input.high_risk_surgery, 1)
            + points_of(input.ischemic_heart_disease, 1)
            + points_of(input.heart_failure, 1)
            + points_of(input.cerebrovascular_disease, 1)
            + points_of(input.insulin_therapy, 1)
            + points_of(creatinine_gt_180, 1);

        LeeRcriResult {
            input: input.clone(),
            creatinine_gt_180,
            creatinine_source,
            total_score,
            risk_percent: RISK_PERCENT.lookup(total_score),
        }
    }
}
