use jiff::Timestamp;
use periop_audit::AuditAction;
use periop_core::models::status::{ScaleKey, ScaleKind, ScaleStatus};
use periop_core::models::timepoint::Timepoint;
use periop_scales::Scale;
use periop_scales::error::ScaleError;
use periop_scales::scales::{
    aldrete::Aldrete,
    ariscat::Ariscat,
    caprini::Caprini,
    el_ganzouri::ElGanzouri,
    las_vegas::LasVegas,
    lee_rcri::LeeRcri,
    mmse::Mmse,
    qor15::Qor15,
    soba::{Soba, SobaInput, SobaResult},
    stop_bang::{StopBang, StopBangSnapshot},
};
use periop_storage::Store;
use serde_json::Value;
use uuid::Uuid;

use crate::Records;
use crate::coordination::{self, Stored};
use crate::error::{Missing, RecordError};

impl<S: Store> Records<S> {
    /// Validate `input`, recompute the scale's result and store it.
    ///
    /// Nothing is written when validation fails. SOBA should be saved through
    /// [`Records::save_soba`] so its STOP-BANG snapshot is refreshed.
    pub fn save_scale<K: Scale>(
        &self,
        scale: &K,
        patient_id: Uuid,
        timepoint: Option<Timepoint>,
        input: &K::Input,
    ) -> Result<Stored<K::Output>, RecordError> {
        let key = ScaleKey::new(scale.kind(), timepoint)?;
        let stored = coordination::upsert::<ScaleStatus, K::Output, _, _>(
            &self.store,
            patient_id,
            key,
            Timestamp::now(),
            |prior| Ok(scale.evaluate(input, prior)?),
        )?;

        tracing::info!(%patient_id, scale = %key, "Scale saved");
        let mut event = self.audit(AuditAction::ScaleSaved, patient_id).on(key.slug());
        if let Some(total) = serde_json::to_value(&stored.data)
            .ok()
            .and_then(|v| v.get("total_score").cloned())
        {
            event = event.with_details(serde_json::json!({ "total_score": total }));
        }
        event.emit();
        Ok(stored)
    }

    pub fn scale_result<K: Scale>(
        &self,
        scale: &K,
        patient_id: Uuid,
        timepoint: Option<Timepoint>,
    ) -> Result<Stored<K::Output>, RecordError> {
        let key = ScaleKey::new(scale.kind(), timepoint)?;
        coordination::fetch::<ScaleStatus, _, _>(&self.store, patient_id, key)
    }

    /// Returns `false` if there was no result to clear.
    pub fn clear_scale(&self, patient_id: Uuid, key: ScaleKey) -> Result<bool, RecordError> {
        let cleared = coordination::clear::<ScaleStatus, _>(
            &self.store,
            patient_id,
            key,
            Timestamp::now(),
        )?;
        if cleared {
            tracing::info!(%patient_id, scale = %key, "Scale cleared");
            self.audit(AuditAction::ScaleCleared, patient_id)
                .on(key.slug())
                .emit();
        }
        Ok(cleared)
    }

    /// Save SOBA with a snapshot of the patient's current STOP-BANG result.
    pub fn save_soba(
        &self,
        patient_id: Uuid,
        mut input: SobaInput,
    ) -> Result<Stored<SobaResult>, RecordError> {
        input.stopbang = match self.scale_result(&StopBang, patient_id, None) {
            Ok(stored) => Some(StopBangSnapshot::from(&stored.data)),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        self.save_scale(&Soba, patient_id, None, &input)
    }

    /// Whether SOBA can be meaningfully filled: STOP-BANG must exist first.
    pub fn soba_ready(&self, patient_id: Uuid) -> Result<bool, RecordError> {
        let stop_bang = ScaleKey::single(ScaleKind::StopBang)?;
        match self.scale_status(patient_id) {
            Ok(status) => Ok(status.is_filled(&stop_bang)),
            Err(RecordError::NotFound(Missing::Aggregate { .. })) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Save a scale from an untyped JSON payload. Returns the stored envelope
    /// as JSON.
    pub fn save_scale_json(
        &self,
        kind: ScaleKind,
        patient_id: Uuid,
        timepoint: Option<Timepoint>,
        input: Value,
    ) -> Result<Value, RecordError> {
        match kind {
            ScaleKind::ElGanzouri => self.save_value(&ElGanzouri, patient_id, timepoint, input),
            ScaleKind::Ariscat => self.save_value(&Ariscat, patient_id, timepoint, input),
            ScaleKind::StopBang => self.save_value(&StopBang, patient_id, timepoint, input),
            ScaleKind::LeeRcri => self.save_value(&LeeRcri, patient_id, timepoint, input),
            ScaleKind::Caprini => self.save_value(&Caprini, patient_id, timepoint, input),
            ScaleKind::LasVegas => self.save_value(&LasVegas, patient_id, timepoint, input),
            ScaleKind::Qor15 => self.save_value(&Qor15, patient_id, timepoint, input),
            ScaleKind::Aldrete => self.save_value(&Aldrete, patient_id, timepoint, input),
            ScaleKind::Mmse => self.save_value(&Mmse, patient_id, timepoint, input),
            ScaleKind::Soba => {
                ScaleKey::new(kind, timepoint)?;
                let input = parse_input(kind, input)?;
                Ok(serde_json::to_value(self.save_soba(patient_id, input)?)?)
            }
        }
    }

    pub fn scale_result_json(
        &self,
        patient_id: Uuid,
        key: ScaleKey,
    ) -> Result<Value, RecordError> {
        let stored: Stored<Value> =
            coordination::fetch::<ScaleStatus, _, _>(&self.store, patient_id, key)?;
        Ok(serde_json::to_value(stored)?)
    }

    fn save_value<K: Scale>(
        &self,
        scale: &K,
        patient_id: Uuid,
        timepoint: Option<Timepoint>,
        input: Value,
    ) -> Result<Value, RecordError> {
        let input: K::Input = parse_input(scale.kind(), input)?;
        let stored = self.save_scale(scale, patient_id, timepoint, &input)?;
        Ok(serde_json::to_value(stored)?)
    }
}

fn parse_input<T: serde::de::DeserializeOwned>(
    kind: ScaleKind,
    input: Value,
) -> Result<T, RecordError> {
    serde_json::from_value(input).map_err(|source| {
        RecordError::Scale(ScaleError::Payload {
            scale: kind,
            source,
        })
    })
}
