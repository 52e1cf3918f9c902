use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{Checks, ScoreRange, ValidationError};
use crate::{Descriptor, Scale};

/// QoR-15: quality of recovery. 15 items, each rated 0–10, total 0–150.
/// Higher is better.
pub struct Qor15;

pub const ITEM_COUNT: usize = 15;

const ITEM_RANGE: ScoreRange = ScoreRange::stepped(0.0, 10.0, 1.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Qor15Input {
    /// Items q1..q15 in questionnaire order.
    pub items: [u8; ITEM_COUNT],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Qor15Result {
    pub input: Qor15Input,
    pub total_score: u32,
}

impl Descriptor for Qor15 {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Qor15
    }

    fn name(&self) -> &str {
        "QoR-15"
    }

    fn description(&self) -> &str {
        "Quality of recovery. 15 items rated 0-10, higher is better"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 150.0, 1.0))
    }
}

impl Scale for Qor15 {
    type Input = Qor15Input;
    type Output = Qor15Result;

    fn validate(&self, input: &Qor15Input) -> Vec<ValidationError> {
        let mut checks = Checks::new(self.id());
        for (index, value) in input.items.iter().enumerate() {
            checks.range(&format!("q{}", index + 1), f64::from(*value), ITEM_RANGE);
        }
        checks.finish()
    }

    fn compute(&self, input: &Qor15Input, _prior: Option<&Qor15Result>) -> Qor15Result {
        Qor15Result {
            input: input.clone(),
            total_score: input.items.iter().map(|&v| u32::from(v)).sum(),
        }
    }
}
