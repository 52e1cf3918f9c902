use periop_core::models::anesthesia::AnesthesiaType;
use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{
    BandTable, Checks, RiskTier, ScoreRange, ThresholdTable, UpperBound, ValidationError,
};
use crate::{Descriptor, Scale};

/// LAS VEGAS: risk of postoperative pulmonary complications from pre- and
/// intraoperative conditions.
pub struct LasVegas;

const SPO2_THRESHOLD: u8 = 96;
const LONG_DURATION_MINUTES: u16 = 135;
const PEEP_THRESHOLD_CM_H2O: f64 = 5.0;
const ASA_THRESHOLD: u8 = 3;

/// A condition that contributed to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LasVegasFactor {
    #[serde(rename = "age_47_66")]
    Age47To66,
    #[serde(rename = "age_67_plus")]
    Age67Plus,
    AsaThreePlus,
    LowPreopSpo2,
    Cancer,
    SleepApnea,
    NonElective,
    LongDuration,
    SupraglotticDevice,
    NonBalancedAnesthesia,
    IntraopDesaturation,
    VasoactiveDrugs,
    LowPeep,
}

impl LasVegasFactor {
    pub fn points(self) -> u32 {
        match self {
            LasVegasFactor::Age67Plus => 2,
            _ => 1,
        }
    }
}

const AGE: BandTable<u16, Option<LasVegasFactor>> = BandTable::new(
    &[
        (UpperBound::Below(47), None),
        (UpperBound::Below(67), Some(LasVegasFactor::Age47To66)),
    ],
    Some(LasVegasFactor::Age67Plus),
);

const RISK: ThresholdTable<RiskTier> =
    ThresholdTable::new(&[(6, RiskTier::High), (3, RiskTier::Moderate)], RiskTier::Low);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LasVegasInput {
    pub age_years: u16,
    pub asa_class: u8,
    pub preop_spo2: u8,
    pub cancer: bool,
    pub obstructive_sleep_apnea: bool,
    pub elective: bool,
    pub duration_minutes: u16,
    pub supraglottic_device: bool,
    pub anesthesia_type: AnesthesiaType,
    pub intraop_desaturation: bool,
    pub vasoactive_drugs: bool,
    pub peep_cm_h2o: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LasVegasResult {
    pub input: LasVegasInput,
    pub factors: Vec<LasVegasFactor>,
    pub total_score: u32,
    pub risk: RiskTier,
}

impl Descriptor for LasVegas {
    fn kind(&self) -> ScaleKind {
        ScaleKind::LasVegas
    }

    fn name(&self) -> &str {
        "LAS VEGAS"
    }

    fn description(&self) -> &str {
        "Postoperative pulmonary complication risk. 0-2 low, 3-5 moderate, 6+ high"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 13.0, 1.0))
    }
}

impl Scale for LasVegas {
    type Input = LasVegasInput;
    type Output = LasVegasResult;

    fn validate(&self, input: &LasVegasInput) -> Vec<ValidationError> {
        let mut checks = Checks::new(self.id());
        checks
            .range("age_years", f64::from(input.age_years), ScoreRange::new(0.0, 130.0))
            .range(
                "asa_class",
                f64::from(input.asa_class),
                ScoreRange::stepped(1.0, 6.0, 1.0),
            )
            .range("preop_spo2", f64::from(input.preop_spo2), ScoreRange::new(50.0, 100.0))
            .range(
                "duration_minutes",
                f64::from(input.duration_minutes),
                ScoreRange::new(0.0, 1440.0),
            )
            .range("peep_cm_h2o", input.peep_cm_h2o, ScoreRange::new(0.0, 30.0));
        checks.finish()
    }

    fn compute(&self, input: &LasVegasInput, _prior: Option<&LasVegasResult>) -> LasVegasResult {
        let conditions = [
            (input.asa_class >= ASA_THRESHOLD, LasVegasFactor::AsaThreePlus),
            (input.preop_spo2 < SPO2_THRESHOLD, LasVegasFactor::LowPreopSpo2),
            (input.cancer, LasVegasFactor::Cancer),
            (input.obstructive_sleep_apnea, LasVegasFactor::SleepApnea),
            (!input.elective, LasVegasFactor::NonElective),
            (
                input.duration_minutes >= LONG_DURATION_MINUTES,
                LasVegasFactor::LongDuration,
            ),
            (input.supraglottic_device, LasVegasFactor::SupraglotticDevice),
            (
                !input.anesthesia_type.is_balanced(),
                LasVegasFactor::NonBalancedAnesthesia,
            ),
            (input.intraop_desaturation, LasVegasFactor::IntraopDesaturation),
            (input.vasoactive_drugs, LasVegasFactor::VasoactiveDrugs),
            (input.peep_cm_h2o < PEEP_THRESHOLD_CM_H2O, LasVegasFactor::LowPeep),
        ];

        let factors: Vec<LasVegasFactor> = AGE
            .classify(input.age_years)
            .into_iter()
            .chain(
                conditions
                    .into_iter()
                    .filter(|(present, _)| *present)
                    .map(|(_, factor)| factor),
            )
            .collect();
        let total_score = factors.iter().map(|f| f.points()).sum();

        LasVegasResult {
            input: input.clone(),
            factors,
            total_score,
            risk: RISK.lookup(total_score),
        }
    }
}
