use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{
    Band, BandTable, Checks, ScoreRange, ThresholdTable, UpperBound, ValidationError,
};
use crate::{Descriptor, Scale};

/// El-Ganzouri multivariate airway risk index. Seven predictors, total 0–12.
pub struct ElGanzouri;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MouthOpening {
    #[serde(rename = "ge_4_cm")]
    AtLeast4Cm,
    #[serde(rename = "lt_4_cm")]
    Under4Cm,
}

impl Band for MouthOpening {
    fn points(self) -> u32 {
        match self {
            MouthOpening::AtLeast4Cm => 0,
            MouthOpening::Under4Cm => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ThyromentalDistance {
    #[serde(rename = "gt_6_5_cm")]
    Over6_5Cm,
    #[serde(rename = "bw_6_0_6_5_cm")]
    From6To6_5Cm,
    #[serde(rename = "lt_6_0_cm")]
    Under6Cm,
}

impl Band for ThyromentalDistance {
    fn points(self) -> u32 {
        match self {
            ThyromentalDistance::Over6_5Cm => 0,
            ThyromentalDistance::From6To6_5Cm => 1,
            ThyromentalDistance::Under6Cm => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MallampatiClass {
    #[serde(rename = "i")]
    I,
    #[serde(rename = "ii")]
    II,
    #[serde(rename = "iii")]
    III,
}

impl Band for MallampatiClass {
    fn points(self) -> u32 {
        match self {
            MallampatiClass::I => 0,
            MallampatiClass::II => 1,
            MallampatiClass::III => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum NeckExtension {
    #[serde(rename = "gt_90_deg")]
    Over90,
    #[serde(rename = "bw_80_90_deg")]
    From80To90,
    #[serde(rename = "lt_80_deg")]
    Under80,
}

impl Band for NeckExtension {
    fn points(self) -> u32 {
        match self {
            NeckExtension::Over90 => 0,
            NeckExtension::From80To90 => 1,
            NeckExtension::Under80 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MandibleProtrusion {
    Able,
    Unable,
}

impl Band for MandibleProtrusion {
    fn points(self) -> u32 {
        match self {
            MandibleProtrusion::Able => 0,
            MandibleProtrusion::Unable => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BodyWeight {
    #[serde(rename = "lt_90_kg")]
    Under90Kg,
    #[serde(rename = "bw_90_110_kg")]
    From90To110Kg,
    #[serde(rename = "gt_110_kg")]
    Over110Kg,
}

impl Band for BodyWeight {
    fn points(self) -> u32 {
        match self {
            BodyWeight::Under90Kg => 0,
            BodyWeight::From90To110Kg => 1,
            BodyWeight::Over110Kg => 2,
        }
    }
}

/// History of difficult intubation. Acts as its own band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IntubationHistory {
    None,
    Uncertain,
    Definite,
}

impl Band for IntubationHistory {
    fn points(self) -> u32 {
        match self {
            IntubationHistory::None => 0,
            IntubationHistory::Uncertain => 1,
            IntubationHistory::Definite => 2,
        }
    }
}

/// Recommended airway management approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AirwayPlan {
    DirectLaryngoscopy,
    VideoLaryngoscopy,
    AwakeFibreoptic,
}

impl AirwayPlan {
    pub fn level(self) -> u8 {
        match self {
            AirwayPlan::DirectLaryngoscopy => 0,
            AirwayPlan::VideoLaryngoscopy => 1,
            AirwayPlan::AwakeFibreoptic => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AirwayPlan::DirectLaryngoscopy => "direct laryngoscopy",
            AirwayPlan::VideoLaryngoscopy => "videolaryngoscopy / alternative devices",
            AirwayPlan::AwakeFibreoptic => "awake fibreoptic intubation",
        }
    }
}

const MOUTH_OPENING: BandTable<f64, MouthOpening> = BandTable::new(
    &[(UpperBound::Below(4.0), MouthOpening::Under4Cm)],
    MouthOpening::AtLeast4Cm,
);

const THYROMENTAL: BandTable<f64, ThyromentalDistance> = BandTable::new(
    &[
        (UpperBound::Below(6.0), ThyromentalDistance::Under6Cm),
        (UpperBound::AtMost(6.5), ThyromentalDistance::From6To6_5Cm),
    ],
    ThyromentalDistance::Over6_5Cm,
);

const MALLAMPATI: BandTable<u8, MallampatiClass> = BandTable::new(
    &[
        (UpperBound::AtMost(1), MallampatiClass::I),
        (UpperBound::AtMost(2), MallampatiClass::II),
    ],
    MallampatiClass::III,
);

const NECK_EXTENSION: BandTable<f64, NeckExtension> = BandTable::new(
    &[
        (UpperBound::Below(80.0), NeckExtension::Under80),
        (UpperBound::AtMost(90.0), NeckExtension::From80To90),
    ],
    NeckExtension::Over90,
);

const WEIGHT: BandTable<f64, BodyWeight> = BandTable::new(
    &[
        (UpperBound::Below(90.0), BodyWeight::Under90Kg),
        (UpperBound::AtMost(110.0), BodyWeight::From90To110Kg),
    ],
    BodyWeight::Over110Kg,
);

const PLAN: ThresholdTable<AirwayPlan> = ThresholdTable::new(
    &[
        (8, AirwayPlan::AwakeFibreoptic),
        (4, AirwayPlan::VideoLaryngoscopy),
    ],
    AirwayPlan::DirectLaryngoscopy,
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElGanzouriInput {
    pub interincisor_gap_cm: f64,
    pub thyromental_distance_cm: f64,
    /// Mallampati class 1–4; class 4 scores as III.
    pub mallampati_class: u8,
    pub neck_extension_deg: f64,
    pub can_protrude_mandible: bool,
    pub weight_kg: f64,
    pub difficult_intubation_history: IntubationHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElGanzouriResult {
    pub input: ElGanzouriInput,
    pub mouth_opening: MouthOpening,
    pub thyromental: ThyromentalDistance,
    pub mallampati: MallampatiClass,
    pub neck_extension: NeckExtension,
    pub mandible_protrusion: MandibleProtrusion,
    pub weight: BodyWeight,
    pub intubation_history: IntubationHistory,
    pub total_score: u32,
    pub plan: AirwayPlan,
}

impl Descriptor for ElGanzouri {
    fn kind(&self) -> ScaleKind {
        ScaleKind::ElGanzouri
    }

    fn name(&self) -> &str {
        "El-Ganzouri"
    }

    fn description(&self) -> &str {
        "Difficult airway prediction. 0-3 direct, 4-7 videolaryngoscopy, 8+ awake intubation"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 12.0, 1.0))
    }
}

impl Scale for ElGanzouri {
    type Input = ElGanzouriInput;
    type Output = ElGanzouriResult;

    fn validate(&self, input: &ElGanzouriInput) -> Vec<ValidationError> {
        let mut checks = Checks::new(self.id());
        checks
            .range(
                "interincisor_gap_cm",
                input.interincisor_gap_cm,
                ScoreRange::new(0.0, 10.0),
            )
            .range(
                "thyromental_distance_cm",
                input.thyromental_distance_cm,
                ScoreRange::new(0.0, 12.0),
            )
            .range(
                "mallampati_class",
                f64::from(input.mallampati_class),
                ScoreRange::stepped(1.0, 4.0, 1.0),
            )
            .range(
                "neck_extension_deg",
                input.neck_extension_deg,
                ScoreRange::new(0.0, 150.0),
            )
            .range("weight_kg", input.weight_kg, ScoreRange::new(20.0, 400.0));
        checks.finish()
    }

    fn compute(
        &self,
        input: &ElGanzouriInput,
        _prior: Option<&ElGanzouriResult>,
    ) -> ElGanzouriResult {
        let mouth_opening = MOUTH_OPENING.classify(input.interincisor_gap_cm);
        let thyromental = THYROMENTAL.classify(input.thyromental_distance_cm);
        let mallampati = MALLAMPATI.classify(input.mallampati_class);
        let neck_extension = NECK_EXTENSION.classify(input.neck_extension_deg);
        let mandible_protrusion = if input.can_protrude_mandible {
            MandibleProtrusion::Able
        } else {
            MandibleProtrusion::Unable
        };
        let weight = WEIGHT.classify(input.weight_kg);
        let intubation_history = input.difficult_intubation_history;

        let total_score = mouth_opening.points()
            + thyromental.points()
            + mallampati.points()
            + neck_extension.points()
            + mandible_protrusion.points()
            + weight.points()
            + intubation_history.points();

        ElGanzouriResult {
            input: input.clone(),
            mouth_opening,
            thyromental,
            mallampati,
            neck_extension,
            mandible_protrusion,
            weight,
            intubation_history,
            total_score,
            plan: PLAN.lookup(total_score),
        }
    }
}
