use thiserror::Error;

use crate::models::status::ScaleKind;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown scale: {0}")]
    UnknownScale(String),

    #[error("timepoint T{0} is outside T0..T12")]
    InvalidTimepoint(u8),

    #[error("invalid timepoint label: {0}")]
    InvalidTimepointLabel(String),

    #[error("scale '{0}' is recorded per timepoint; a timepoint is required")]
    TimepointRequired(ScaleKind),

    #[error("scale '{0}' is not recorded per timepoint")]
    UnexpectedTimepoint(ScaleKind),

    #[error("invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
