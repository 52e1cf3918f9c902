//! The save / read / clear protocol shared by scale results and slices.
//!
//! Each patient owns a status aggregate per record family that flags which
//! slots are filled. Saving loads (or creates) the aggregate, recomputes the
//! slot's record from scratch, flips the flag and commits both objects in a
//! single batch. Clearing removes the record and resets the flag.

use std::fmt;

use jiff::Timestamp;
use periop_core::keys;
use periop_core::models::status::{ScaleKey, ScaleStatus, SliceStatus};
use periop_core::models::timepoint::Timepoint;
use periop_storage::state::try_load_state;
use periop_storage::{Batch, Store};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Missing, RecordError};

/// A per-patient status aggregate.
pub trait Aggregate: Serialize + DeserializeOwned {
    /// Identifies one record within the aggregate.
    type Slot: Copy + fmt::Display;

    const KIND: &'static str;

    fn create(patient_id: Uuid, now: Timestamp) -> Self;

    fn key(patient_id: Uuid) -> String;

    fn slot_key(patient_id: Uuid, slot: Self::Slot) -> String;

    fn missing_slot(patient_id: Uuid, slot: Self::Slot) -> Missing;

    /// Set the slot's filled flag. Returns `true` if it changed.
    fn mark(&mut self, slot: Self::Slot, filled: bool, now: Timestamp) -> bool;
}

impl Aggregate for ScaleStatus {
    type Slot = ScaleKey;

    const KIND: &'static str = "scale status";

    fn create(patient_id: Uuid, now: Timestamp) -> Self {
        ScaleStatus::new(patient_id, now)
    }

    fn key(patient_id: Uuid) -> String {
        keys::scale_status(patient_id)
    }

    fn slot_key(patient_id: Uuid, slot: ScaleKey) -> String {
        keys::scale_result(patient_id, &slot)
    }

    fn missing_slot(patient_id: Uuid, slot: ScaleKey) -> Missing {
        Missing::ScaleResult {
            patient_id,
            key: slot,
        }
    }

    fn mark(&mut self, slot: ScaleKey, filled: bool, now: Timestamp) -> bool {
        let changed = self.set_filled(slot, filled);
        self.updated_at = now;
        changed
    }
}

impl Aggregate for SliceStatus {
    type Slot = Timepoint;

    const KIND: &'static str = "slice status";

    fn create(patient_id: Uuid, now: Timestamp) -> Self {
        SliceStatus::new(patient_id, now)
    }

    fn key(patient_id: Uuid) -> String {
        keys::slice_status(patient_id)
    }

    fn slot_key(patient_id: Uuid, slot: Timepoint) -> String {
        keys::slice(patient_id, slot)
    }

    fn missing_slot(patient_id: Uuid, slot: Timepoint) -> Missing {
        Missing::Slice {
            patient_id,
            timepoint: slot,
        }
    }

    fn mark(&mut self, slot: Timepoint, filled: bool, now: Timestamp) -> bool {
        let changed = self.set_filled(slot, filled);
        self.updated_at = now;
        changed
    }
}

/// Envelope persisted for every filled slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<T> {
    pub patient_id: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub data: T,
}

pub(crate) fn ensure_patient<S: Store + ?Sized>(
    store: &S,
    patient_id: Uuid,
) -> Result<(), RecordError> {
    if store.exists(&keys::patient(patient_id))? {
        Ok(())
    } else {
        Err(RecordError::NotFound(Missing::Patient(patient_id)))
    }
}

/// Load the aggregate, or `NotFound` if the patient has none yet.
pub fn load_aggregate<A, S>(store: &S, patient_id: Uuid) -> Result<A, RecordError>
where
    A: Aggregate,
    S: Store + ?Sized,
{
    ensure_patient(store, patient_id)?;
    try_load_state(store, &A::key(patient_id))?.ok_or(RecordError::NotFound(
        Missing::Aggregate {
            patient_id,
            kind: A::KIND,
        },
    ))
}

/// Recompute and persist one slot. `compute` receives the previously stored
/// value, if any, and must return the complete new value.
pub fn upsert<A, T, S, F>(
    store: &S,
    patient_id: Uuid,
    slot: A::Slot,
    now: Timestamp,
    compute: F,
) -> Result<Stored<T>, RecordError>
where
    A: Aggregate,
    T: Serialize + DeserializeOwned,
    S: Store + ?Sized,
    F: FnOnce(Option<&T>) -> Result<T, RecordError>,
{
    ensure_patient(store, patient_id)?;

    let aggregate_key = A::key(patient_id);
    let mut aggregate: A = match try_load_state(store, &aggregate_key)? {
        Some(aggregate) => aggregate,
        None => {
            tracing::debug!(%patient_id, kind = A::KIND, "Creating status aggregate");
            A::create(patient_id, now)
        }
    };

    let slot_key = A::slot_key(patient_id, slot);
    let prior: Option<Stored<T>> = try_load_state(store, &slot_key)?;
    let data = compute(prior.as_ref().map(|p| &p.data))?;
    let stored = Stored {
        patient_id,
        created_at: prior.map_or(now, |p| p.created_at),
        updated_at: now,
        data,
    };

    aggregate.mark(slot, true, now);

    let mut batch = Batch::new();
    batch
        .put_json(slot_key, &stored)?
        .put_json(aggregate_key, &aggregate)?;
    store.commit(batch)?;

    Ok(stored)
}

/// Read one slot. Distinguishes a missing aggregate from a missing record.
pub fn fetch<A, T, S>(
    store: &S,
    patient_id: Uuid,
    slot: A::Slot,
) -> Result<Stored<T>, RecordError>
where
    A: Aggregate,
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    ensure_patient(store, patient_id)?;
    if !store.exists(&A::key(patient_id))? {
        return Err(RecordError::NotFound(Missing::Aggregate {
            patient_id,
            kind: A::KIND,
        }));
    }
    try_load_state(store, &A::slot_key(patient_id, slot))?
        .ok_or_else(|| RecordError::NotFound(A::missing_slot(patient_id, slot)))
}

/// Remove one slot's record and reset its flag. Returns `false` when there
/// was nothing to clear.
pub fn clear<A, S>(
    store: &S,
    patient_id: Uuid,
    slot: A::Slot,
    now: Timestamp,
) -> Result<bool, RecordError>
where
    A: Aggregate,
    S: Store + ?Sized,
{
    ensure_patient(store, patient_id)?;

    let aggregate_key = A::key(patient_id);
    let Some(mut aggregate) = try_load_state::<A, _>(store, &aggregate_key)? else {
        return Ok(false);
    };

    let slot_key = A::slot_key(patient_id, slot);
    let had_record = store.exists(&slot_key)?;
    let flag_changed = aggregate.mark(slot, false, now);
    if !had_record && !flag_changed {
        return Ok(false);
    }

    let mut batch = Batch::new();
    if had_record {
        batch.delete(slot_key)?;
    }
    batch.put_json(aggregate_key, &aggregate)?;
    store.commit(batch)?;

    Ok(true)
}
