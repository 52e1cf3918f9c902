use serde::{Deserialize, Serialize};

use crate::check_key;
use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Put { key: String, body: Vec<u8> },
    Delete { key: String },
}

impl Op {
    pub fn key(&self) -> &str {
        match self {
            Op::Put { key, .. } | Op::Delete { key } => key,
        }
    }
}

/// A set of writes applied together. Later operations on the same key win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    ops: Vec<Op>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(
        &mut self,
        key: impl Into<String>,
        body: Vec<u8>,
    ) -> Result<&mut Self, StorageError> {
        let key = key.into();
        check_key(&key)?;
        self.ops.push(Op::Put { key, body });
        Ok(self)
    }

    pub fn put_json<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self, StorageError> {
        let body = serde_json::to_vec_pretty(value)?;
        self.put(key, body)
    }

    pub fn delete(&mut self, key: impl Into<String>) -> Result<&mut Self, StorageError> {
        let key = key.into();
        check_key(&key)?;
        self.ops.push(Op::Delete { key });
        Ok(self)
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
