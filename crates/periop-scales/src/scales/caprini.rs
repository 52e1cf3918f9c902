use std::collections::BTreeSet;

use periop_core::models::patient::{body_mass_index, round_to_tenth};
use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{
    Band, BandTable, Checks, ScoreRange, ThresholdTable, UpperBound, ValidationError,
};
use crate::{Descriptor, Scale};

/// Caprini: venous thromboembolism risk. Age band, BMI and a weighted
/// checklist of risk factors.
pub struct Caprini;

const BMI_THRESHOLD: f64 = 25.0;
const BMI_POINTS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CapriniAge {
    #[serde(rename = "le_40")]
    UpTo40,
    #[serde(rename = "bw_41_60")]
    From41To60,
    #[serde(rename = "bw_61_74")]
    From61To74,
    #[serde(rename = "ge_75")]
    From75,
}

impl Band for CapriniAge {
    fn points(self) -> u32 {
        match self {
            CapriniAge::UpTo40 => 0,
            CapriniAge::From41To60 => 1,
            CapriniAge::From61To74 => 2,
            CapriniAge::From75 => 3,
        }
    }
}

const AGE_BANDS: BandTable<u16, CapriniAge> = BandTable::new(
    &[
        (UpperBound::AtMost(40), CapriniAge::UpTo40),
        (UpperBound::AtMost(60), CapriniAge::From41To60),
        (UpperBound::AtMost(74), CapriniAge::From61To74),
    ],
    CapriniAge::From75,
);

/// Checklist items other than age and BMI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CapriniFactor {
    // 1 point
    LegSwelling,
    VaricoseVeins,
    SepsisWithinMonth,
    SevereLungDiseaseWithinMonth,
    OralContraceptivesOrHrt,
    PregnantOrPostpartum,
    AdversePregnancyHistory,
    AcuteMyocardialInfarction,
    HeartFailureWithinMonth,
    BedRest,
    InflammatoryBowelDisease,
    Copd,
    MinorSurgery,
    OtherRiskFactor,
    // 2 points
    #[serde(rename = "bed_rest_over_72h")]
    BedRestOver72h,
    MajorSurgeryWithinMonth,
    Malignancy,
    LimbImmobilization,
    CentralVenousAccess,
    ArthroscopicSurgery,
    #[serde(rename = "laparoscopy_over_60_min")]
    LaparoscopyOver60Min,
    #[serde(rename = "major_surgery_over_45_min")]
    MajorSurgeryOver45Min,
    // 3 points
    PersonalVteHistory,
    FactorVLeiden,
    #[serde(rename = "prothrombin_20210a")]
    Prothrombin20210A,
    LupusAnticoagulant,
    FamilyVteHistory,
    Hyperhomocysteinemia,
    HeparinInducedThrombocytopenia,
    AnticardiolipinAntibodies,
    OtherThrombophilia,
    // 5 points
    StrokeWithinMonth,
    SpinalCordInjury,
    MultipleTrauma,
    MajorJointReplacement,
    HipPelvisOrLegFracture,
}

impl CapriniFactor {
    pub const ALL: [CapriniFactor; 36] = [
        CapriniFactor::LegSwelling,
        CapriniFactor::VaricoseVeins,
        CapriniFactor::SepsisWithinMonth,
        CapriniFactor::SevereLungDiseaseWithinMonth,
        CapriniFactor::OralContraceptivesOrHrt,
        CapriniFactor::PregnantOrPostpartum,
        CapriniFactor::AdversePregnancyHistory,
        CapriniFactor::AcuteMyocardialInfarction,
        CapriniFactor::HeartFailureWithinMonth,
        CapriniFactor::BedRest,
        CapriniFactor::InflammatoryBowelDisease,
        CapriniFactor::Copd,
        CapriniFactor::MinorSurgery,
        CapriniFactor::OtherRiskFactor,
        CapriniFactor::BedRestOver72h,
        CapriniFactor::MajorSurgeryWithinMonth,
        CapriniFactor::Malignancy,
        CapriniFactor::LimbImmobilization,
        CapriniFactor::CentralVenousAccess,
        CapriniFactor::ArthroscopicSurgery,
        CapriniFactor::LaparoscopyOver60Min,
        CapriniFactor::MajorSurgeryOver45Min,
        CapriniFactor::PersonalVteHistory,
        CapriniFactor::FactorVLeiden,
        CapriniFactor::Prothrombin20210A,
        CapriniFactor::LupusAnticoagulant,
        CapriniFactor::FamilyVteHistory,
        CapriniFactor::Hyperhomocysteinemia,
        CapriniFactor::HeparinInducedThrombocytopenia,
        CapriniFactor::AnticardiolipinAntibodies,
        CapriniFactor::OtherThrombophilia,
        CapriniFactor::StrokeWithinMonth,
        CapriniFactor::SpinalCordInjury,
        CapriniFactor::MultipleTrauma,
        CapriniFactor::MajorJointReplacement,
        CapriniFactor::HipPelvisOrLegFracture,
    ];

    pub fn points(self) -> u32 {
        use CapriniFactor::*;
        match self {
            LegSwelling
            | VaricoseVeins
            | SepsisWithinMonth
            | SevereLungDiseaseWithinMonth
            | OralContraceptivesOrHrt
            | PregnantOrPostpartum
            | AdversePregnancyHistory
            | AcuteMyocardialInfarction
            | HeartFailureWithinMonth
            | BedRest
            | InflammatoryBowelDisease
            | Copd
            | MinorSurgery
            | OtherRiskFactor => 1,
            BedRestOver72h
            | MajorSurgeryWithinMonth
            | Malignancy
            | LimbImmobilization
            | CentralVenousAccess
            | ArthroscopicSurgery
            | LaparoscopyOver60Min
            | MajorSurgeryOver45Min => 2,
            PersonalVteHistory
            | FactorVLeiden
            | Prothrombin20210A
            | LupusAnticoagulant
            | FamilyVteHistory
            | Hyperhomocysteinemia
            | HeparinInducedThrombocytopenia
            | AnticardiolipinAntibodies
            | OtherThrombophilia => 3,
            StrokeWithinMonth
            | SpinalCordInjury
            | MultipleTrauma
            | MajorJointReplacement
            | HipPelvisOrLegFracture => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CapriniRisk {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl CapriniRisk {
    pub fn level(self) -> u8 {
        match self {
            CapriniRisk::VeryLow => 0,
            CapriniRisk::Low => 1,
            CapriniRisk::Moderate => 2,
            CapriniRisk::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CapriniRisk::VeryLow => "very low",
            CapriniRisk::Low => "low",
            CapriniRisk::Moderate => "moderate",
            CapriniRisk::High => "high",
        }
    }
}

const RISK: ThresholdTable<CapriniRisk> = ThresholdTable::new(
    &[
        (5, CapriniRisk::High),
        (3, CapriniRisk::Moderate),
        (2, CapriniRisk::Low),
    ],
    CapriniRisk::VeryLow,
);

/// Every field is optional. `age_years` wins over an explicit `age_band`;
/// an explicit `bmi_gt_25` wins over the value derived from height and weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CapriniInput {
    pub age_years: Option<u16>,
    pub age_band: Option<CapriniAge>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi_gt_25: Option<bool>,
    pub factors: BTreeSet<CapriniFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CapriniResult {
    pub input: CapriniInput,
    pub age_band: CapriniAge,
    /// Derived from height and weight, rounded to one decimal.
    pub bmi: Option<f64>,
    pub bmi_gt_25: bool,
    pub total_score: u32,
    pub risk: CapriniRisk,
}

impl Descriptor for Caprini {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Caprini
    }

    fn name(&self) -> &str {
        "Caprini"
    }

    fn description(&self) -> &str {
        "Venous thromboembolism risk. 0-1 very low, 2 low, 3-4 moderate, 5+ high"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        let max = CapriniAge::From75.points()
            + BMI_POINTS
            + CapriniFactor::ALL.iter().map(|f| f.points()).sum::<u32>();
        Some(ScoreRange::stepped(0.0, f64::from(max), 1.0))
    }
}

impl Scale for Caprini {
    type Input = CapriniInput;
    type Output = CapriniResult;

    fn validate(&self, input: &CapriniInput) -> Vec<ValidationError> {
        let mut checks = Checks::new(self.id());
        checks
            .optional_range(
                "age_years",
                input.age_years.map(f64::from),
                ScoreRange::new(0.0, 130.0),
            )
            .optional_range("height_cm", input.height_cm, ScoreRange::new(80.0, 250.0))
            .optional_range("weight_kg", input.weight_kg, ScoreRange::new(20.0, 400.0));
        checks.finish()
    }

    fn compute(&self, input: &CapriniInput, _prior: Option<&CapriniResult>) -> CapriniResult {
        let age_band = match (input.age_years, input.age_band) {
            (Some(age), _) => AGE_BANDS.classify(age),
            (None, Some(band)) => band,
            (None, None) => CapriniAge::UpTo40,
        };

        let raw_bmi = match (input.height_cm, input.weight_kg) {
            (Some(height), Some(weight)) => body_mass_index(height, weight),
            _ => None,
        };
        let bmi_gt_25 = input
            .bmi_gt_25
            .or(raw_bmi.map(|bmi| bmi > BMI_THRESHOLD))
            .unwrap_or(false);

        let factor_points: u32 = input.factors.iter().map(|f| f.points()).sum();
        let bmi_points = if bmi_gt_25 { BMI_POINTS } else { 0 };
        let total_score = age_band.points() + bmi_points + factor_points;

        CapriniResult {
            input: input.clone(),
            age_band,
            bmi: raw_bmi.map(round_to_tenth),
            bmi_gt_25,
            total_score,
            risk: RISK.lookup(total_score),
        }
    }
}
