//! periop-scales
//!
//! Perioperative scoring scales. Pure calculators with no storage
//! dependency: each scale validates a typed input payload and derives its
//! bands, points, total and risk tier.

pub mod error;
pub mod scales;
pub mod scoring;

use periop_core::models::status::ScaleKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use error::ScaleError;
use scales::{
    aldrete::Aldrete, ariscat::Ariscat, caprini::Caprini, el_ganzouri::ElGanzouri,
    las_vegas::LasVegas, lee_rcri::LeeRcri, mmse::Mmse, qor15::Qor15, soba::Soba,
    stop_bang::StopBang,
};
use scoring::{ScoreRange, ValidationError};

/// Descriptive half of a scale, usable behind `dyn`.
pub trait Descriptor: Send + Sync {
    fn kind(&self) -> ScaleKind;

    /// Human-readable name (e.g., "STOP-BANG", "Caprini").
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Range of the aggregate score, if the scale produces one.
    fn score_range(&self) -> Option<ScoreRange>;

    fn id(&self) -> &'static str {
        self.kind().id()
    }

    fn keyed_by_timepoint(&self) -> bool {
        self.kind().keyed_by_timepoint()
    }
}

/// A scale calculator: validates an input and computes its result.
pub trait Scale: Descriptor {
    type Input: Clone + Serialize + DeserializeOwned;
    type Output: Clone + Serialize + DeserializeOwned;

    fn validate(&self, input: &Self::Input) -> Vec<ValidationError>;

    /// Derive the result. `prior` is the previously stored result, used by
    /// scales that carry values forward when a field is omitted.
    fn compute(&self, input: &Self::Input, prior: Option<&Self::Output>) -> Self::Output;

    fn evaluate(
        &self,
        input: &Self::Input,
        prior: Option<&Self::Output>,
    ) -> Result<Self::Output, ScaleError> {
        let errors = self.validate(input);
        if !errors.is_empty() {
            return Err(ScaleError::Invalid {
                scale: self.kind(),
                errors,
            });
        }
        Ok(self.compute(input, prior))
    }
}

/// Catalogue entry for a scale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleInfo {
    pub kind: ScaleKind,
    pub name: String,
    pub description: String,
    pub score_range: Option<ScoreRange>,
    pub keyed_by_timepoint: bool,
}

impl ScaleInfo {
    pub fn of(scale: &dyn Descriptor) -> Self {
        Self {
            kind: scale.kind(),
            name: scale.name().to_string(),
            description: scale.description().to_string(),
            score_range: scale.score_range(),
            keyed_by_timepoint: scale.keyed_by_timepoint(),
        }
    }
}

/// Returns all supported scales.
pub fn all_scales() -> Vec<Box<dyn Descriptor>> {
    ScaleKind::ALL.into_iter().map(descriptor).collect()
}

pub fn descriptor(kind: ScaleKind) -> Box<dyn Descriptor> {
    match kind {
        ScaleKind::ElGanzouri => Box::new(ElGanzouri),
        ScaleKind::Ariscat => Box::new(Ariscat),
        ScaleKind::StopBang => Box::new(StopBang),
        ScaleKind::Soba => Box::new(Soba),
        ScaleKind::LeeRcri => Box::new(LeeRcri),
        ScaleKind::Caprini => Box::new(Caprini),
        ScaleKind::LasVegas => Box::new(LasVegas),
        ScaleKind::Qor15 => Box::new(Qor15),
        ScaleKind::Aldrete => Box::new(Aldrete),
        ScaleKind::Mmse => Box::new(Mmse),
    }
}

/// Look up a scale by its identifier.
pub fn get_scale(id: &str) -> Result<Box<dyn Descriptor>, ScaleError> {
    id.parse::<ScaleKind>()
        .map(descriptor)
        .map_err(|_| ScaleError::UnknownScale(id.to_string()))
}

/// Score a JSON payload without storing anything.
pub fn score_json(
    kind: ScaleKind,
    input: serde_json::Value,
) -> Result<serde_json::Value, ScaleError> {
    match kind {
        ScaleKind::ElGanzouri => evaluate_value(&ElGanzouri, input),
        ScaleKind::Ariscat => evaluate_value(&Ariscat, input),
        ScaleKind::StopBang => evaluate_value(&StopBang, input),
        ScaleKind::Soba => evaluate_value(&Soba, input),
        ScaleKind::LeeRcri => evaluate_value(&LeeRcri, input),
        ScaleKind::Caprini => evaluate_value(&Caprini, input),
        ScaleKind::LasVegas => evaluate_value(&LasVegas, input),
        ScaleKind::Qor15 => evaluate_value(&Qor15, input),
        ScaleKind::Aldrete => evaluate_value(&Aldrete, input),
        ScaleKind::Mmse => evaluate_value(&Mmse, input),
    }
}

fn evaluate_value<S: Scale>(
    scale: &S,
    input: serde_json::Value,
) -> Result<serde_json::Value, ScaleError> {
    let payload = |source| ScaleError::Payload {
        scale: scale.kind(),
        source,
    };
    let input: S::Input = serde_json::from_value(input).map_err(payload)?;
    let output = scale.evaluate(&input, None)?;
    serde_json::to_value(&output).map_err(payload)
}
