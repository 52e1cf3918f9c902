use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{Band, ScoreRange, ValidationError};
use crate::{Descriptor, Scale};

/// Modified Aldrete score: readiness for discharge from the recovery unit.
/// Five criteria rated 0–2, total 0–10. A total of 9 or more is the usual
/// discharge threshold.
pub struct Aldrete;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Activity {
    MovesFourLimbs,
    MovesTwoLimbs,
    Immobile,
}

impl Band for Activity {
    fn points(self) -> u32 {
        match self {
            Activity::MovesFourLimbs => 2,
            Activity::MovesTwoLimbs => 1,
            Activity::Immobile => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Respiration {
    BreathesDeeplyAndCoughs,
    DyspneaOrShallow,
    Apneic,
}

impl Band for Respiration {
    fn points(self) -> u32 {
        match self {
            Respiration::BreathesDeeplyAndCoughs => 2,
            Respiration::DyspneaOrShallow => 1,
            Respiration::Apneic => 0,
        }
    }
}

/// Blood pressure relative to the preanaesthetic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Circulation {
    #[serde(rename = "within_20_percent")]
    Within20Percent,
    #[serde(rename = "within_20_50_percent")]
    Within20To50Percent,
    #[serde(rename = "beyond_50_percent")]
    Beyond50Percent,
}

impl Band for Circulation {
    fn points(self) -> u32 {
        match self {
            Circulation::Within20Percent => 2,
            Circulation::Within20To50Percent => 1,
            Circulation::Beyond50Percent => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Consciousness {
    FullyAwake,
    ArousableOnCalling,
    Unresponsive,
}

impl Band for Consciousness {
    fn points(self) -> u32 {
        match self {
            Consciousness::FullyAwake => 2,
            Consciousness::ArousableOnCalling => 1,
            Consciousness::Unresponsive => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Oxygenation {
    /// SpO2 above 92% on room air.
    #[serde(rename = "gt_92_room_air")]
    Above92RoomAir,
    /// Needs supplemental oxygen to keep SpO2 above 90%.
    #[serde(rename = "gt_90_with_oxygen")]
    Above90WithOxygen,
    #[serde(rename = "lt_90_with_oxygen")]
    Below90WithOxygen,
}

impl Band for Oxygenation {
    fn points(self) -> u32 {
        match self {
            Oxygenation::Above92RoomAir => 2,
            Oxygenation::Above90WithOxygen => 1,
            Oxygenation::Below90WithOxygen => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AldreteInput {
    pub activity: Activity,
    pub respiration: Respiration,
    pub circulation: Circulation,
    pub consciousness: Consciousness,
    pub oxygenation: Oxygenation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AldreteResult {
    pub input: AldreteInput,
    pub total_score: u32,
}

impl Descriptor for Aldrete {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Aldrete
    }

    fn name(&self) -> &str {
        "Aldrete"
    }

    fn description(&self) -> &str {
        "Post-anaesthesia recovery. Five criteria rated 0-2, 9+ ready for discharge"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 10.0, 1.0))
    }
}

impl Scale for Aldrete {
    type Input = AldreteInput;
    type Output = AldreteResult;

    // Every option is a closed enum; nothing left to range-check.
    fn validate(&self, _input: &AldreteInput) -> Vec<ValidationError> {
        Vec::new()
    }

    fn compute(&self, input: &AldreteInput, _prior: Option<&AldreteResult>) -> AldreteResult {
        let total_score = input.activity.points()
            + input.respiration.points()
            + input.circulation.points()
            + input.consciousness.points()
            + input.oxygenation.points();

        AldreteResult {
            input: input.clone(),
            total_score,
        }
    }
}
