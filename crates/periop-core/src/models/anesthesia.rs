use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Anaesthesia technique planned or used for the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AnesthesiaType {
    /// Inhalational maintenance combined with IV opioids and relaxants.
    Balanced,
    TotalIntravenous,
    Inhalational,
    Regional,
    /// General anaesthesia combined with a regional block.
    Combined,
}

impl AnesthesiaType {
    pub fn is_balanced(self) -> bool {
        matches!(self, AnesthesiaType::Balanced)
    }
}
