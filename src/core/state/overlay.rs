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

//! Per-invocation write buffer over a ledger store.
//!
//! Reads fall through to the base store unless the key was written during the invocation.
//! Nothing reaches the base store until [`WriteOverlay::into_ops`] is committed, so a failed
//! invocation leaves the base untouched.

use std::collections::BTreeMap;

use crate::core::state::persistent_state::{KvOp, LedgerStore, StateError};

/// Buffered writes on top of a read-only base.
pub struct WriteOverlay<'a, S: LedgerStore> {
    base: &'a S,
    /// `None` marks a buffered delete.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: LedgerStore> WriteOverlay<'a, S> {
    /// Start an empty overlay.
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// True if nothing was written.
    pub fn is_clean(&self) -> bool {
        self.pending.is_empty()
    }

    /// Buffered writes as a commit batch, in key order.
    pub fn into_ops(self) -> Vec<KvOp> {
        self.pending
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => KvOp::Put { key, value },
                None => KvOp::Del { key },
            })
            .collect()
    }
}

impl<S: LedgerStore> LedgerStore for WriteOverlay<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        if let Some(v) = self.pending.get(key) {
            return Ok(v.clone());
        }
        self.base.get(key)
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StateError> {
        self.pending.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn apply(&mut self, ops: Vec<KvOp>) -> Result<(), StateError> {
        for op in ops {
            match op {
                KvOp::Put { key, value } => {
                    self.pending.insert(key, Some(value));
                }
                KvOp::Del { key } => {
                    self.pending.insert(key, None);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::persistent_state::MemoryStore;

    #[test]
    fn reads_see_own_writes_and_base_is_untouched() {
        let mut base = MemoryStore::new();
        base.put(b"k", b"old".to_vec()).unwrap();

        let mut ov = WriteOverlay::new(&base);
        assert_eq!(ov.get(b"k").unwrap(), Some(b"old".to_vec()));
        ov.put(b"k", b"new".to_vec()).unwrap();
        assert_eq!(ov.get(b"k").unwrap(), Some(b"new".to_vec()));

        let ops = ov.into_ops();
        assert_eq!(base.get(b"k").unwrap(), Some(b"old".to_vec()));

        base.apply(ops).unwrap();
        assert_eq!(base.get(b"k").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn buffered_delete_hides_base_value() {
        let mut base = MemoryStore::new();
        base.put(b"k", b"v".to_vec()).unwrap();

        let mut ov = WriteOverlay::new(&base);
        ov.apply(vec![KvOp::Del { key: b"k".to_vec() }]).unwrap();
        assert_eq!(ov.get(b"k").unwrap(), None);
        assert_eq!(ov.into_ops(), vec![KvOp::Del { key: b"k".to_vec() }]);
    }

    #[test]
    fn dropped_overlay_discards_writes() {
        let base = MemoryStore::new();
        {
            let mut ov = WriteOverlay::new(&base);
            ov.put(b"k", b"v".to_vec()).unwrap();
            assert!(!ov.is_clean());
        }
        assert!(base.is_empty());
    }
}
