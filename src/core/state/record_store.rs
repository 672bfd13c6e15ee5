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
#![deny(missing_docs)]

//! Token record store: load/save of the single token record under a fixed key.
//!
//! ## Formats
//! - **json** (default): the object layout already found in deployed ledgers,
//!
//!   ```text
//!   {"name":"Coin","symbol":"CN","total":1000,"decimals":2,
//!    "balance":{"<owner>":700,"bob":300,"<owner>_carol":100}}
//!   ```
//!
//!   where `balance` is one map holding both balances and `owner_spender` allowance keys.
//! - **canonical**: deterministic bincode of [`Token`] with separate balance/allowance maps.
//!
//! Both formats are decoded under a hard byte cap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ledger::errors::LedgerError;
use crate::core::ledger::token::Token;
use crate::core::state::persistent_state::LedgerStore;
use crate::core::types::{
    allowance_key, decode_canonical_limited, encode_canonical, is_balance_key,
    split_allowance_key, Amount, CanonicalMap, CodecError,
};

/// Well-known key of the token record.
pub const TOKEN_RECORD_KEY: &str = "token";

/// Default decode cap for a stored record (4 MiB).
pub const DEFAULT_MAX_RECORD_BYTES: usize = 4 * 1024 * 1024;

/// Persisted record encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// Field-name preserving JSON with a single dual-purpose map.
    #[default]
    Json,
    /// Canonical bincode.
    Canonical,
}

/// JSON layout of the record.
#[derive(Debug, Serialize, Deserialize)]
struct JsonTokenRecord {
    name: String,
    symbol: String,
    total: Amount,
    decimals: u8,
    /// `null` is accepted and read as empty.
    #[serde(default)]
    balance: Option<CanonicalMap<String, Amount>>,
}

impl From<&Token> for JsonTokenRecord {
    fn from(t: &Token) -> Self {
        let mut ledger = t.balances.clone();
        for ((owner, spender), amount) in t.allowances.iter() {
            ledger.insert(allowance_key(owner, spender), *amount);
        }
        Self {
            name: t.name.clone(),
            symbol: t.symbol.clone(),
            total: t.total_supply,
            decimals: t.decimals,
            balance: Some(ledger),
        }
    }
}

impl From<JsonTokenRecord> for Token {
    fn from(r: JsonTokenRecord) -> Self {
        let mut token = Token {
            name: r.name,
            symbol: r.symbol,
            total_supply: r.total,
            decimals: r.decimals,
            balances: CanonicalMap::new(),
            allowances: CanonicalMap::new(),
        };
        for (key, amount) in r.balance.unwrap_or_default() {
            match split_allowance_key(&key) {
                Some((owner, spender)) => {
                    token
                        .allowances
                        .insert((owner.to_string(), spender.to_string()), amount);
                }
                None => {
                    token.balances.insert(key, amount);
                }
            }
        }
        token
    }
}

/// Load/save of the token record.
#[derive(Clone, Debug)]
pub struct TokenRecordStore {
    key: Vec<u8>,
    format: RecordFormat,
    max_bytes: usize,
}

impl Default for TokenRecordStore {
    fn default() -> Self {
        Self::new(TOKEN_RECORD_KEY, RecordFormat::Json, DEFAULT_MAX_RECORD_BYTES)
    }
}

impl TokenRecordStore {
    /// Store for `key` using `format`, rejecting records larger than `max_bytes`.
    pub fn new(key: &str, format: RecordFormat, max_bytes: usize) -> Self {
        Self {
            key: key.as_bytes().to_vec(),
            format,
            max_bytes,
        }
    }

    /// Record key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Record format.
    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// Reject a balance-entry key this format cannot read back as a balance.
    ///
    /// The JSON layout shares one map between balances and `owner_spender` allowances, so its
    /// balance keys must not contain the separator. The canonical layout keeps them apart.
    pub fn check_balance_key(&self, arg: &'static str, key: &str) -> Result<(), LedgerError> {
        match self.format {
            RecordFormat::Json if !is_balance_key(key) => Err(LedgerError::InvalidAccountKey {
                arg,
                reason: "must not contain the allowance separator '_'",
            }),
            _ => Ok(()),
        }
    }

    /// Encode a record.
    pub fn encode(&self, token: &Token) -> Result<Vec<u8>, CodecError> {
        match self.format {
            RecordFormat::Json => serde_json::to_vec(&JsonTokenRecord::from(token))
                .map_err(|_| CodecError::Serialize),
            RecordFormat::Canonical => encode_canonical(token),
        }
    }

    /// Decode a record.
    pub fn decode(&self, bytes: &[u8]) -> Result<Token, CodecError> {
        match self.format {
            RecordFormat::Json => {
                if bytes.len() > self.max_bytes {
                    return Err(CodecError::TooLarge);
                }
                let rec: JsonTokenRecord =
                    serde_json::from_slice(bytes).map_err(|_| CodecError::Deserialize)?;
                Ok(rec.into())
            }
            RecordFormat::Canonical => decode_canonical_limited(bytes, self.max_bytes),
        }
    }

    /// True if a record is stored, without decoding it.
    pub fn exists<S: LedgerStore>(&self, store: &S) -> Result<bool, LedgerError> {
        let raw = store
            .get(&self.key)
            .map_err(|_| LedgerError::StoreReadFailure)?;
        Ok(raw.is_some())
    }

    /// Load the record. `Ok(None)` when absent; `RecordDecode` when present but malformed.
    pub fn load<S: LedgerStore>(&self, store: &S) -> Result<Option<Token>, LedgerError> {
        let Some(raw) = store
            .get(&self.key)
            .map_err(|_| LedgerError::StoreReadFailure)?
        else {
            return Ok(None);
        };
        let token = self.decode(&raw).map_err(|e| {
            debug!(error = %e, len = raw.len(), "token record decode failed");
            LedgerError::RecordDecode
        })?;
        Ok(Some(token))
    }

    /// Load the record, treating absence as a failed precondition.
    pub fn load_required<S: LedgerStore>(&self, store: &S) -> Result<Token, LedgerError> {
        self.load(store)?.ok_or(LedgerError::RecordNotFound)
    }

    /// Encode and write the whole record.
    pub fn save<S: LedgerStore>(&self, store: &mut S, token: &Token) -> Result<(), LedgerError> {
        let bytes = self
            .encode(token)
            .map_err(|e| LedgerError::StoreWriteFailure(e.to_string()))?;
        store
            .put(&self.key, bytes)
            .map_err(|e| LedgerError::StoreWriteFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::persistent_state::MemoryStore;

    #[test]
    fn json_layout_uses_single_dual_purpose_map() {
        let mut t = Token::genesis("Coin", "CN", 1000, 2, "ab01");
        t.transfer("ab01", "bob", 300).unwrap();
        t.approve("ab01", "carol", 100);

        let rs = TokenRecordStore::default();
        let json = String::from_utf8(rs.encode(&t).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Coin","symbol":"CN","total":1000,"decimals":2,"balance":{"ab01":700,"ab01_carol":100,"bob":300}}"#
        );
        assert_eq!(rs.decode(json.as_bytes()).unwrap(), t);
    }

    #[test]
    fn separator_keys_only_rejected_by_json() {
        let json = TokenRecordStore::default();
        assert!(json.check_balance_key("recipient", "bob").is_ok());
        assert!(matches!(
            json.check_balance_key("recipient", "bob_smith"),
            Err(LedgerError::InvalidAccountKey { arg: "recipient", .. })
        ));

        let canonical = TokenRecordStore::new("token", RecordFormat::Canonical, 1024);
        assert!(canonical.check_balance_key("recipient", "bob_smith").is_ok());
    }

    #[test]
    fn json_null_ledger_reads_as_empty() {
        let rs = TokenRecordStore::default();
        let t = rs
            .decode(br#"{"name":"A","symbol":"B","total":0,"decimals":0,"balance":null}"#)
            .unwrap();
        assert!(t.balances.is_empty());
        assert!(t.allowances.is_empty());
    }

    #[test]
    fn missing_and_malformed_are_distinct() {
        let rs = TokenRecordStore::default();
        let mut store = MemoryStore::new();
        assert_eq!(rs.load(&store).unwrap(), None);
        assert_eq!(rs.load_required(&store), Err(LedgerError::RecordNotFound));

        store.put(b"token", b"{not json".to_vec()).unwrap();
        assert_eq!(rs.load(&store), Err(LedgerError::RecordDecode));
    }

    #[test]
    fn oversized_record_is_rejected() {
        let rs = TokenRecordStore::new("token", RecordFormat::Json, 16);
        let t = Token::genesis("A long token name", "ALTN", 1, 0, "x");
        let bytes = TokenRecordStore::default().encode(&t).unwrap();
        assert!(matches!(rs.decode(&bytes), Err(CodecError::TooLarge)));
    }

    #[test]
    fn spender_keeps_extra_separators() {
        let mut t = Token::genesis("Coin", "CN", 10, 0, "ab");
        t.approve("ab", "team_ops", 4);
        let rs = TokenRecordStore::default();
        let back = rs.decode(&rs.encode(&t).unwrap()).unwrap();
        assert_eq!(back.allowance("ab", "team_ops"), Some(4));
    }
}
