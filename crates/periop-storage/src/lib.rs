//! periop-storage
//!
//! Key/value object storage for patient records. Objects are JSON documents
//! addressed by slash-separated keys (see `periop_core::keys`). Each batch
//! commits as one SQLite transaction.

pub mod batch;
pub mod error;
pub mod sqlite;
pub mod state;

pub use batch::{Batch, Op};
pub use error::StorageError;
pub use sqlite::SqliteStore;

/// An object store that applies each [`Batch`] all-or-nothing.
pub trait Store: Send + Sync {
    /// Fetch an object. Missing keys yield [`StorageError::NotFound`].
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// All keys starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    fn commit(&self, batch: Batch) -> Result<(), StorageError>;

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}
