use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A perioperative timepoint, T0 through T12.
///
/// T0 is the pre-operative baseline; T10 is the post-operative cognitive
/// follow-up at which MMSE is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct Timepoint(u8);

impl Timepoint {
    pub const LAST: u8 = 12;
    pub const BASELINE: Timepoint = Timepoint(0);
    pub const COGNITIVE_FOLLOW_UP: Timepoint = Timepoint(10);

    pub fn new(index: u8) -> Result<Self, CoreError> {
        if index > Self::LAST {
            return Err(CoreError::InvalidTimepoint(index));
        }
        Ok(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Timepoint> {
        (0..=Self::LAST).map(Timepoint)
    }

    /// The clinical moment the timepoint stands for.
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "on admission",
            1 => "on the operating table",
            2 => "15 min after the epidural bolus",
            3 => "after induction and intubation",
            4 => "after abdominal gas insufflation",
            5 => "in steep Trendelenburg position",
            6 => "main stage of surgery",
            7 => "after abdominal gas desufflation",
            8 => "right after extubation",
            9 => "1 h after transfer to the recovery unit",
            10 => "end of postoperative day 1",
            11 => "end of postoperative day 2",
            _ => "end of postoperative day 5",
        }
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Accepts `"T3"`, `"t3"` or `"3"`.
impl FromStr for Timepoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('T')
            .or_else(|| s.strip_prefix('t'))
            .unwrap_or(s);
        let index: u8 = digits
            .parse()
            .map_err(|_| CoreError::InvalidTimepointLabel(s.to_string()))?;
        Timepoint::new(index)
    }
}

impl<'de> Deserialize<'de> for Timepoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        Timepoint::new(index).map_err(serde::de::Error::custom)
    }
}
