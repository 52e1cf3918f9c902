use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scales::stop_bang::StopBangSnapshot;
use crate::scoring::{ScoreRange, ValidationError};
use crate::{Descriptor, Scale};

/// SOBA: perioperative checklist for obese patients. Six red flags, no total.
/// Shown alongside the patient's STOP-BANG result.
pub struct Soba;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SobaRedFlag {
    #[serde(rename = "poor_functional_status")]
    PoorFunctionalStatus,
    #[serde(rename = "ecg_changes")]
    EcgChanges,
    #[serde(rename = "uncontrolled_hypertension_or_ihd")]
    UncontrolledHypertensionOrIhd,
    #[serde(rename = "spo2_room_air_lt_94")]
    LowRoomAirSpo2,
    #[serde(rename = "hypercapnia_co2_gt_28")]
    Hypercapnia,
    #[serde(rename = "vte_history")]
    VteHistory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct SobaInput {
    pub poor_functional_status: bool,
    pub ecg_changes: bool,
    pub uncontrolled_hypertension_or_ihd: bool,
    pub spo2_room_air_lt_94: bool,
    pub hypercapnia_co2_gt_28: bool,
    pub vte_history: bool,
    /// STOP-BANG result at save time. Filled in by the record layer.
    pub stopbang: Option<StopBangSnapshot>,
}

impl SobaInput {
    pub fn red_flags(&self) -> Vec<SobaRedFlag> {
        [
            (self.poor_functional_status, SobaRedFlag::PoorFunctionalStatus),
            (self.ecg_changes, SobaRedFlag::EcgChanges),
            (
                self.uncontrolled_hypertension_or_ihd,
                SobaRedFlag::UncontrolledHypertensionOrIhd,
            ),
            (self.spo2_room_air_lt_94, SobaRedFlag::LowRoomAirSpo2),
            (self.hypercapnia_co2_gt_28, SobaRedFlag::Hypercapnia),
            (self.vte_history, SobaRedFlag::VteHistory),
        ]
        .into_iter()
        .filter(|(raised, _)| *raised)
        .map(|(_, flag)| flag)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SobaResult {
    pub input: SobaInput,
    pub red_flags: Vec<SobaRedFlag>,
    pub stopbang: Option<StopBangSnapshot>,
}

impl Descriptor for Soba {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Soba
    }

    fn name(&self) -> &str {
        "SOBA"
    }

    fn description(&self) -> &str {
        "Red-flag checklist for obese surgical patients, read together with STOP-BANG"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        None
    }
}

impl Scale for Soba {
    type Input = SobaInput;
    type Output = SobaResult;

    fn validate(&self, _input: &SobaInput) -> Vec<ValidationError> {
        Vec::new()
    }

    /// Keeps the previously cached STOP-BANG snapshot when none is supplied.
    fn compute(&self, input: &SobaInput, prior: Option<&SobaResult>) -> SobaResult {
        let stopbang = input.stopbang.or(prior.and_then(|p| p.stopbang));
        SobaResult {
            input: SobaInput {
                stopbang,
                ..input.clone()
            },
            red_flags: input.red_flags(),
            stopbang,
        }
    }
}
