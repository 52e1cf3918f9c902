use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Defines the valid range for a score or a raw measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ScoreRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub const fn stepped(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub scale_id: String,
    pub field: String,
    pub value: Option<f64>,
    pub expected_range: Option<ScoreRange>,
    pub message: String,
}

/// Collects validation failures for one input payload.
#[derive(Debug)]
pub struct Checks {
    scale_id: String,
    errors: Vec<ValidationError>,
}

impl Checks {
    pub fn new(scale_id: impl Into<String>) -> Self {
        Self {
            scale_id: scale_id.into(),
            errors: Vec::new(),
        }
    }

    pub fn range(&mut self, field: &str, value: f64, range: ScoreRange) -> &mut Self {
        if !range.contains(value) {
            self.errors.push(ValidationError {
                scale_id: self.scale_id.clone(),
                field: field.to_string(),
                value: Some(value),
                expected_range: Some(range),
                message: format!(
                    "{}: {} value {} is outside range [{}, {}]",
                    self.scale_id, field, value, range.min, range.max,
                ),
            });
        }
        self
    }

    pub fn optional_range(
        &mut self,
        field: &str,
        value: Option<f64>,
        range: ScoreRange,
    ) -> &mut Self {
        if let Some(value) = value {
            self.range(field, value, range);
        }
        self
    }

    pub fn rule(&mut self, field: &str, holds: bool, message: impl Into<String>) -> &mut Self {
        if !holds {
            self.errors.push(ValidationError {
                scale_id: self.scale_id.clone(),
                field: field.to_string(),
                value: None,
                expected_range: None,
                message: format!("{}: {}", self.scale_id, message.into()),
            });
        }
        self
    }

    pub fn finish(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// A categorical band that contributes a fixed number of points.
pub trait Band: Copy {
    fn points(self) -> u32;
}

/// Upper edge of a band row. `Below` is exclusive, `AtMost` inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpperBound<T> {
    Below(T),
    AtMost(T),
}

impl<T: PartialOrd + Copy> UpperBound<T> {
    pub fn admits(&self, value: T) -> bool {
        match *self {
            UpperBound::Below(edge) => value < edge,
            UpperBound::AtMost(edge) => value <= edge,
        }
    }
}

/// Ordered band rows, checked in ascending order of their upper edge.
/// Values past the last row fall into `otherwise`.
#[derive(Debug, Clone, Copy)]
pub struct BandTable<T: 'static, B: 'static> {
    rows: &'static [(UpperBound<T>, B)],
    otherwise: B,
}

impl<T: PartialOrd + Copy, B: Copy> BandTable<T, B> {
    pub const fn new(rows: &'static [(UpperBound<T>, B)], otherwise: B) -> Self {
        Self { rows, otherwise }
    }

    pub fn classify(&self, value: T) -> B {
        self.rows
            .iter()
            .find(|(bound, _)| bound.admits(value))
            .map(|(_, band)| *band)
            .unwrap_or(self.otherwise)
    }
}

/// Maps a total score to a tier. Rows hold the minimum total for each tier,
/// highest first.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable<R: 'static> {
    rows: &'static [(u32, R)],
    otherwise: R,
}

impl<R: Copy> ThresholdTable<R> {
    pub const fn new(rows: &'static [(u32, R)], otherwise: R) -> Self {
        Self { rows, otherwise }
    }

    pub fn lookup(&self, total: u32) -> R {
        self.rows
            .iter()
            .find(|(min, _)| total >= *min)
            .map(|(_, tier)| *tier)
            .unwrap_or(self.otherwise)
    }
}

/// Three-level risk classification shared by several scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn level(self) -> u8 {
        match self {
            RiskTier::Low => 0,
            RiskTier::Moderate => 1,
            RiskTier::High => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

pub(crate) fn points_of(flag: bool, points: u32) -> u32 {
    if flag { points } else { 0 }
}
