use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::timepoint::Timepoint;

/// The clinical scales the system records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScaleKind {
    ElGanzouri,
    Ariscat,
    StopBang,
    Soba,
    LeeRcri,
    Caprini,
    LasVegas,
    Qor15,
    Aldrete,
    Mmse,
}

impl ScaleKind {
    pub const ALL: [ScaleKind; 10] = [
        ScaleKind::ElGanzouri,
        ScaleKind::Ariscat,
        ScaleKind::StopBang,
        ScaleKind::Soba,
        ScaleKind::LeeRcri,
        ScaleKind::Caprini,
        ScaleKind::LasVegas,
        ScaleKind::Qor15,
        ScaleKind::Aldrete,
        ScaleKind::Mmse,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ScaleKind::ElGanzouri => "el_ganzouri",
            ScaleKind::Ariscat => "ariscat",
            ScaleKind::StopBang => "stop_bang",
            ScaleKind::Soba => "soba",
            ScaleKind::LeeRcri => "lee_rcri",
            ScaleKind::Caprini => "caprini",
            ScaleKind::LasVegas => "las_vegas",
            ScaleKind::Qor15 => "qor15",
            ScaleKind::Aldrete => "aldrete",
            ScaleKind::Mmse => "mmse",
        }
    }

    /// Scales administered repeatedly, once per timepoint.
    pub fn keyed_by_timepoint(self) -> bool {
        matches!(self, ScaleKind::Mmse)
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ScaleKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ScaleKind::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| CoreError::UnknownScale(s.to_string()))
    }
}

/// Identifies one stored scale result for a patient: the scale, plus the
/// timepoint for scales recorded per timepoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ScaleKey {
    pub kind: ScaleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timepoint: Option<Timepoint>,
}

impl ScaleKey {
    pub fn new(kind: ScaleKind, timepoint: Option<Timepoint>) -> Result<Self, CoreError> {
        match (kind.keyed_by_timepoint(), timepoint) {
            (true, None) => Err(CoreError::TimepointRequired(kind)),
            (false, Some(_)) => Err(CoreError::UnexpectedTimepoint(kind)),
            _ => Ok(Self { kind, timepoint }),
        }
    }

    /// Key for a scale recorded once per patient.
    pub fn single(kind: ScaleKind) -> Result<Self, CoreError> {
        Self::new(kind, None)
    }

    /// File-name friendly form, e.g. `stop_bang` or `mmse_t10`.
    pub fn slug(&self) -> String {
        match self.timepoint {
            Some(tp) => format!("{}_t{}", self.kind.id(), tp.index()),
            None => self.kind.id().to_string(),
        }
    }
}

impl fmt::Display for ScaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.timepoint {
            Some(tp) => write!(f, "{} at {tp}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Per-patient record of which scales have been filled in.
///
/// Created on the first save for the patient and never deleted by clearing
/// a scale; clearing only resets the corresponding flag.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleStatus {
    pub patient_id: Uuid,
    pub filled: BTreeSet<ScaleKey>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl ScaleStatus {
    pub fn new(patient_id: Uuid, now: jiff::Timestamp) -> Self {
        Self {
            patient_id,
            filled: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_filled(&self, key: &ScaleKey) -> bool {
        self.filled.contains(key)
    }

    /// Returns `true` if the flag changed.
    pub fn set_filled(&mut self, key: ScaleKey, filled: bool) -> bool {
        if filled {
            self.filled.insert(key)
        } else {
            self.filled.remove(&key)
        }
    }

    /// Timepoints at which a per-timepoint scale has been filled.
    pub fn filled_timepoints(&self, kind: ScaleKind) -> Vec<Timepoint> {
        self.filled
            .iter()
            .filter(|key| key.kind == kind)
            .filter_map(|key| key.timepoint)
            .collect()
    }
}

/// Per-patient record of which physiological slices have been filled in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SliceStatus {
    pub patient_id: Uuid,
    pub filled: BTreeSet<Timepoint>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl SliceStatus {
    pub fn new(patient_id: Uuid, now: jiff::Timestamp) -> Self {
        Self {
            patient_id,
            filled: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_filled(&self, timepoint: Timepoint) -> bool {
        self.filled.contains(&timepoint)
    }

    /// Returns `true` if the flag changed.
    pub fn set_filled(&mut self, timepoint: Timepoint, filled: bool) -> bool {
        if filled {
            self.filled.insert(timepoint)
        } else {
            self.filled.remove(&timepoint)
        }
    }
}
