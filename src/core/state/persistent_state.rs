// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Key-value ledger backends: the `LedgerStore` seam, sled persistence and an in-memory map.

use sled::transaction::ConflictableTransactionError;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// State errors.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("db open")]
    DbOpen,
    #[error("db io")]
    DbIo,
    #[error("tx conflict")]
    TxConflict,
}

/// State operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KvOp {
    /// Put key/value.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete key.
    Del { key: Vec<u8> },
}

/// Key-value ledger consumed by the token engine.
///
/// Writes become visible to subsequent reads on the same store immediately.
pub trait LedgerStore {
    /// Read a value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;
    /// Write a value.
    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StateError>;
    /// Apply a batch of operations as one unit.
    fn apply(&mut self, ops: Vec<KvOp>) -> Result<(), StateError>;
}

/// Persistent state wrapper.
#[derive(Clone)]
pub struct PersistentState {
    db: sled::Db,
}

impl PersistentState {
    /// Open sled DB at path (directory).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let db = sled::open(path).map_err(|_| StateError::DbOpen)?;
        Ok(Self { db })
    }

    /// Get value.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let v = self.db.get(key).map_err(|_| StateError::DbIo)?;
        Ok(v.map(|iv| iv.to_vec()))
    }

    /// Atomic commit using sled transactions.
    pub fn commit_atomic(&self, ops: Vec<KvOp>) -> Result<(), StateError> {
        if ops.is_empty() {
            return Ok(());
        }
        let res: Result<(), sled::transaction::TransactionError<StateError>> =
            self.db.transaction(|t| {
                for op in ops.iter() {
                    match op {
                        KvOp::Put { key, value } => {
                            t.insert(key.as_slice(), value.as_slice()).map_err(|_| {
                                ConflictableTransactionError::Abort(StateError::DbIo)
                            })?;
                        }
                        KvOp::Del { key } => {
                            t.remove(key.as_slice()).map_err(|_| {
                                ConflictableTransactionError::Abort(StateError::DbIo)
                            })?;
                        }
                    }
                }
                Ok(())
            });

        match res {
            Ok(()) => {}
            Err(sled::transaction::TransactionError::Abort(e)) => return Err(e),
            Err(sled::transaction::TransactionError::Storage(_)) => return Err(StateError::DbIo),
        }
        self.db.flush().map_err(|_| StateError::DbIo)?;
        Ok(())
    }
}

impl LedgerStore for PersistentState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        PersistentState::get(self, key)
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StateError> {
        self.commit_atomic(vec![KvOp::Put {
            key: key.to_vec(),
            value,
        }])
    }

    fn apply(&mut self, ops: Vec<KvOp>) -> Result<(), StateError> {
        self.commit_atomic(ops)
    }
}

/// In-memory ledger (tests, tooling, embedding hosts).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StateError> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn apply(&mut self, ops: Vec<KvOp>) -> Result<(), StateError> {
        for op in ops {
            match op {
                KvOp::Put { key, value } => {
                    self.entries.insert(key, value);
                }
                KvOp::Del { key } => {
                    self.entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
