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

//! Deterministic core types, account keys and canonical encoding helpers.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Record codec error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization")]
    Serialize,
    #[error("deserialization")]
    Deserialize,
    #[error("size limit exceeded")]
    TooLarge,
}

/// Canonical bincode options (deterministic).
fn bincode_opts() -> impl Options {
    // Fixint encoding provides a stable integer representation.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode with deterministic rules. Requires deterministic container ordering (use BTreeMap/BTreeSet).
pub fn encode_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, CodecError> {
    bincode_opts()
        .serialize(v)
        .map_err(|_| CodecError::Serialize)
}

/// Decode with a hard size cap.
pub fn decode_canonical_limited<T: DeserializeOwned>(
    bytes: &[u8],
    max: usize,
) -> Result<T, CodecError> {
    if bytes.len() > max {
        return Err(CodecError::TooLarge);
    }
    // Container length prefixes are bounded by the same cap inside the deserializer.
    bincode_opts()
        .with_limit(max as u64)
        .deserialize(bytes)
        .map_err(|_| CodecError::Deserialize)
}

/// Account key: lowercase hex of a caller identity, or an opaque caller-chosen label.
pub type AccountId = String;

/// Token amount in base units.
pub type Amount = u64;

/// Canonical map type alias.
pub type CanonicalMap<K, V> = BTreeMap<K, V>;

/// Separator between owner and spender in a persisted allowance key.
pub const ALLOWANCE_SEPARATOR: char = '_';

/// Compose the persisted allowance key `owner_spender`.
pub fn allowance_key(owner: &str, spender: &str) -> String {
    let mut key = String::with_capacity(owner.len() + 1 + spender.len());
    key.push_str(owner);
    key.push(ALLOWANCE_SEPARATOR);
    key.push_str(spender);
    key
}

/// Split a persisted ledger key into `(owner, spender)` if it names an allowance.
///
/// Owners never contain the separator, so the split happens at its first occurrence and the
/// spender keeps any further separators.
pub fn split_allowance_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(ALLOWANCE_SEPARATOR)
}

/// True if `key` can be stored as a balance entry without being read back as an allowance.
pub fn is_balance_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(ALLOWANCE_SEPARATOR)
}
