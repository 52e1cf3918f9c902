use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{Checks, RiskTier, ScoreRange, ThresholdTable, ValidationError, points_of};
use crate::{Descriptor, Scale};

/// STOP-BANG: obstructive sleep apnea screening. Eight yes/no items, total 0–8.
pub struct StopBang;

const BMI_THRESHOLD: f64 = 35.0;
const AGE_THRESHOLD: u16 = 50;
const NECK_THRESHOLD_CM: f64 = 40.0;

const RISK: ThresholdTable<RiskTier> =
    ThresholdTable::new(&[(5, RiskTier::High), (3, RiskTier::Moderate)], RiskTier::Low);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StopBangInput {
    pub snoring: bool,
    pub tired: bool,
    pub observed_apnea: bool,
    pub hypertension: bool,
    pub bmi: f64,
    pub age_years: u16,
    pub neck_circumference_cm: f64,
    pub male: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StopBangResult {
    pub input: StopBangInput,
    pub bmi_ge_35: bool,
    pub age_gt_50: bool,
    pub neck_gt_40: bool,
    pub total_score: u32,
    pub risk: RiskTier,
}

/// STOP-BANG score and tier as seen by dependent scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StopBangSnapshot {
    pub total_score: u32,
    pub risk: RiskTier,
}

impl From<&StopBangResult> for StopBangSnapshot {
    fn from(result: &StopBangResult) -> Self {
        Self {
            total_score: result.total_score,
            risk: result.risk,
        }
    }
}

impl Descriptor for StopBang {
    fn kind(&self) -> ScaleKind {
        ScaleKind::StopBang
    }

    fn name(&self) -> &str {
        "STOP-BANG"
    }

    fn description(&self) -> &str {
        "Obstructive sleep apnea screening. 0-2 low, 3-4 moderate, 5-8 high"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 8.0, 1.0))
    }
}

impl Scale for StopBang {
    type Input = StopBangInput;
    type Output = StopBangResult;

    fn validate(&self, input: &StopBangInput) -> Vec<ValidationError> {
        let mut checks = Checks::new(self.id());
        checks
            .range("bmi", input.bmi, ScoreRange::new(5.0, 120.0))
            .range("age_years", f64::from(input.age_years), ScoreRange::new(0.0, 130.0))
            .range(
                "neck_circumference_cm",
                input.neck_circumference_cm,
                ScoreRange::new(10.0, 80.0),
            );
        checks.finish()
    }

    fn compute(&self, input: &StopBangInput, _prior: Option<&StopBangResult>) -> StopBangResult {
        let bmi_ge_35 = input.bmi >= BMI_THRESHOLD;
        let age_gt_50 = input.age_years > AGE_THRESHOLD;
        let neck_gt_40 = input.neck_circumference_cm > NECK_THRESHOLD_CM;

        let total_score = [
            input.snoring,
            input.tired,
            input.observed_apnea,
            input.hypertension,
            bmi_ge_35,
            age_gt_50,
            neck_gt_40,
            input.male,
        ]
        .into_iter()
        .map(|flag| points_of(flag, 1))
        .sum();

        StopBangResult {
            input: input.clone(),
            bmi_ge_35,
            age_gt_50,
            neck_gt_40,
            total_score,
            risk: RISK.lookup(total_score),
        }
    }
}
