use periop_core::models::status::{ScaleStatus, SliceStatus};
use periop_scales::scales::el_ganzouri::{AirwayPlan, ElGanzouri};
use periop_storage::Store;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::Records;
use crate::coordination::load_aggregate;
use crate::error::{Missing, RecordError};

/// Airway assessment state, used to gate anaesthesia planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AirwayStatus {
    pub filled: bool,
    pub total_score: Option<u32>,
    pub plan: Option<AirwayPlan>,
}

impl<S: Store> Records<S> {
    pub fn scale_status(&self, patient_id: Uuid) -> Result<ScaleStatus, RecordError> {
        load_aggregate(&self.store, patient_id)
    }

    pub fn slice_status(&self, patient_id: Uuid) -> Result<SliceStatus, RecordError> {
        load_aggregate(&self.store, patient_id)
    }

    /// El-Ganzouri state. Unlike the other reads, an unfilled scale is not
    /// an error here.
    pub fn airway_status(&self, patient_id: Uuid) -> Result<AirwayStatus, RecordError> {
        match self.scale_result(&ElGanzouri, patient_id, None) {
            Ok(stored) => Ok(AirwayStatus {
                filled: true,
                total_score: Some(stored.data.total_score),
                plan: Some(stored.data.plan),
            }),
            Err(e @ RecordError::NotFound(Missing::Patient(_))) => Err(e),
            Err(e) if e.is_not_found() => Ok(AirwayStatus {
                filled: false,
                total_score: None,
                plan: None,
            }),
            Err(e) => Err(e),
        }
    }
}
