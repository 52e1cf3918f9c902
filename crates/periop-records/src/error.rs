use std::fmt;

use periop_core::error::CoreError;
use periop_core::models::status::ScaleKey;
use periop_core::models::timepoint::Timepoint;
use periop_scales::error::ScaleError;
use periop_scales::scoring::ValidationError;
use periop_storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

/// What a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Patient(Uuid),
    /// No status aggregate of the named kind exists for the patient yet.
    Aggregate { patient_id: Uuid, kind: &'static str },
    /// The aggregate exists but holds no record for this slot.
    ScaleResult { patient_id: Uuid, key: ScaleKey },
    Slice { patient_id: Uuid, timepoint: Timepoint },
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Patient(id) => write!(f, "patient {id}"),
            Missing::Aggregate { patient_id, kind } => {
                write!(f, "{kind} for patient {patient_id}")
            }
            Missing::ScaleResult { patient_id, key } => {
                write!(f, "{key} result for patient {patient_id}")
            }
            Missing::Slice {
                patient_id,
                timepoint,
            } => write!(f, "slice {timepoint} for patient {patient_id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("not found: {0}")]
    NotFound(Missing),

    #[error("slice {timepoint} rejected: {}", join_messages(.errors))]
    InvalidSlice {
        timepoint: Timepoint,
        errors: Vec<ValidationError>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecordError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound(_))
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
