use periop_core::models::status::ScaleKind;
use thiserror::Error;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("unknown scale: {0}")]
    UnknownScale(String),

    #[error("{scale} input rejected: {}", join_messages(.errors))]
    Invalid {
        scale: ScaleKind,
        errors: Vec<ValidationError>,
    },

    #[error("malformed {scale} payload: {source}")]
    Payload {
        scale: ScaleKind,
        #[source]
        source: serde_json::Error,
    },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
