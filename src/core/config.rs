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

//! Ledger configuration (TOML).
//!
//! ```text
//! [store]
//! data_dir = "./data"
//! record_key = "token"
//! record_format = "json"        # or "canonical"
//! max_record_bytes = 4194304
//!
//! [policy]
//! allow_reinitialize = true
//!
//! [identity]
//! encoding = "raw"              # or "pem"
//!
//! [log]
//! format = "compact"            # or "json"
//! ```
//!
//! Every section and field is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::identity::IdentityEncoding;
use crate::core::state::record_store::{
    RecordFormat, DEFAULT_MAX_RECORD_BYTES, TOKEN_RECORD_KEY,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cannot read config file.
    #[error("read config")]
    Read,
    /// Cannot parse TOML.
    #[error("parse config: {0}")]
    Parse(String),
    /// Semantically invalid value.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Configuration root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Ledger storage.
    pub store: StoreConfig,
    /// Operation policy.
    pub policy: PolicyConfig,
    /// Caller identity mapping.
    pub identity: IdentityConfig,
    /// Logging.
    pub log: LogConfig,
}

/// Storage settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// sled data directory.
    pub data_dir: String,
    /// Key of the token record.
    pub record_key: String,
    /// Record encoding.
    pub record_format: RecordFormat,
    /// Decode cap for the stored record.
    pub max_record_bytes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            record_key: TOKEN_RECORD_KEY.to_string(),
            record_format: RecordFormat::Json,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }
}

/// Operation policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// If true, `Initialize` on an existing record silently resets it.
    pub allow_reinitialize: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_reinitialize: true,
        }
    }
}

/// Identity settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// How identity bytes become account keys.
    pub encoding: IdentityEncoding,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
}

impl LedgerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: LedgerConfig =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.message().to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|_| ConfigError::Read)?;
        Self::from_toml_str(&raw)
    }

    /// Check value constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.record_key.is_empty() {
            return Err(ConfigError::Invalid("store.record_key must be non-empty"));
        }
        if self.store.max_record_bytes == 0 {
            return Err(ConfigError::Invalid("store.max_record_bytes must be > 0"));
        }
        if self.store.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("store.data_dir must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let cfg = LedgerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, LedgerConfig::default());
        assert!(cfg.policy.allow_reinitialize);
        assert_eq!(cfg.store.record_key, "token");
        assert_eq!(cfg.identity.encoding, IdentityEncoding::Raw);
    }

    #[test]
    fn parses_all_sections() {
        let cfg = LedgerConfig::from_toml_str(
            r#"
            [store]
            data_dir = "/srv/amun/token"
            record_format = "canonical"
            max_record_bytes = 1024

            [policy]
            allow_reinitialize = false

            [identity]
            encoding = "pem"

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.store.data_dir, "/srv/amun/token");
        assert_eq!(cfg.store.record_key, "token");
        assert_eq!(cfg.store.record_format, RecordFormat::Canonical);
        assert_eq!(cfg.store.max_record_bytes, 1024);
        assert!(!cfg.policy.allow_reinitialize);
        assert_eq!(cfg.identity.encoding, IdentityEncoding::Pem);
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            LedgerConfig::from_toml_str("[policy]\nallow_reinit = true\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            LedgerConfig::from_toml_str("[store]\nrecord_key = \"\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LedgerConfig::from_toml_str("[identity]\nencoding = \"base64\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
