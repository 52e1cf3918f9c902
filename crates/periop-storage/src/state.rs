use serde::de::DeserializeOwned;

use crate::Store;
use crate::error::StorageError;

/// Load and deserialize a JSON object.
pub fn load_state<T: DeserializeOwned, S: Store + ?Sized>(
    store: &S,
    key: &str,
) -> Result<T, StorageError> {
    let body = store.get(key)?;
    Ok(serde_json::from_slice(&body)?)
}

/// Like [`load_state`], but a missing object is `None` rather than an error.
pub fn try_load_state<T: DeserializeOwned, S: Store + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load_state(store, key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
