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

//! Identity resolution: host-supplied caller bytes to a stable account key.
//!
//! ## Encodings
//! - **raw** (default): lowercase hex of the identity bytes exactly as supplied by the host.
//! - **pem**: the identity bytes carry a PEM certificate (typically inside a serialized
//!   MSP identity container). The first block that parses as PEM is located and its DER
//!   contents hex-encoded.
//!
//! Both encodings are deterministic; the account key never depends on anything but the bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::AccountId;

const PEM_BEGIN: &str = "-----BEGIN ";

/// Identity errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Host did not supply caller identity bytes.
    #[error("caller identity unavailable")]
    Unavailable,
    /// PEM encoding selected but the identity carries no decodable PEM block.
    #[error("malformed PEM identity")]
    MalformedPem,
}

/// How caller identity bytes map to an account key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityEncoding {
    /// Hex of the raw identity bytes.
    #[default]
    Raw,
    /// Hex of the DER bytes inside the first PEM block.
    Pem,
}

/// Per-invocation source of caller identity bytes (supplied by the host).
pub trait IdentitySource {
    /// Raw identity bytes of the invoking party, or `None` when the host has none.
    fn caller_identity(&self) -> Option<Vec<u8>>;
}

/// Fixed identity for one invocation.
#[derive(Clone, Debug, Default)]
pub struct HostIdentity {
    bytes: Option<Vec<u8>>,
}

impl HostIdentity {
    /// Identity backed by the given bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }

    /// Host that supplies no identity.
    pub fn unavailable() -> Self {
        Self { bytes: None }
    }
}

impl IdentitySource for HostIdentity {
    fn caller_identity(&self) -> Option<Vec<u8>> {
        self.bytes.clone()
    }
}

/// Lowercase hex account key of raw identity bytes.
pub fn hex_account_id(bytes: &[u8]) -> AccountId {
    hex::encode(bytes)
}

/// Resolves caller identity to account keys under a fixed encoding.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityResolver {
    encoding: IdentityEncoding,
}

impl IdentityResolver {
    /// Create a resolver for the given encoding.
    pub fn new(encoding: IdentityEncoding) -> Self {
        Self { encoding }
    }

    /// Resolve the invoking party's account key.
    pub fn resolve(&self, source: &dyn IdentitySource) -> Result<AccountId, IdentityError> {
        let bytes = source.caller_identity().ok_or(IdentityError::Unavailable)?;
        self.account_id(&bytes)
    }

    /// Map identity bytes to an account key.
    pub fn account_id(&self, bytes: &[u8]) -> Result<AccountId, IdentityError> {
        if bytes.is_empty() {
            return Err(IdentityError::Unavailable);
        }
        match self.encoding {
            IdentityEncoding::Raw => Ok(hex_account_id(bytes)),
            IdentityEncoding::Pem => {
                let der = first_pem_block(bytes).ok_or(IdentityError::MalformedPem)?;
                Ok(hex_account_id(&der))
            }
        }
    }
}

/// DER contents of the first well-formed PEM block found anywhere in `bytes`.
///
/// A `-----BEGIN ` line that does not open a valid block is skipped and the scan resumes at
/// the next one.
fn first_pem_block(bytes: &[u8]) -> Option<Vec<u8>> {
    let marker = PEM_BEGIN.as_bytes();
    bytes
        .windows(marker.len())
        .enumerate()
        .filter(|(_, w)| *w == marker)
        .find_map(|(at, _)| pem::parse(&bytes[at..]).ok())
        .map(|block| block.contents().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CERT: &str = "-----BEGIN CERTIFICATE-----\nAQIDBA==\n-----END CERTIFICATE-----\n";

    #[test]
    fn raw_identity_is_lowercase_hex() {
        let r = IdentityResolver::new(IdentityEncoding::Raw);
        assert_eq!(r.account_id(&[0xAB, 0x01, 0xff]).unwrap(), "ab01ff");
    }

    #[test]
    fn missing_or_empty_identity_is_unavailable() {
        let r = IdentityResolver::default();
        assert_eq!(
            r.resolve(&HostIdentity::unavailable()),
            Err(IdentityError::Unavailable)
        );
        assert_eq!(
            r.resolve(&HostIdentity::new(Vec::new())),
            Err(IdentityError::Unavailable)
        );
    }

    #[test]
    fn pem_identity_uses_der_bytes() {
        let r = IdentityResolver::new(IdentityEncoding::Pem);
        assert_eq!(r.account_id(CERT.as_bytes()).unwrap(), "01020304");
    }

    #[test]
    fn pem_identity_inside_binary_container() {
        let mut framed = vec![0x0a, 0x07];
        framed.extend_from_slice(b"Org1MSP");
        framed.extend_from_slice(&[0x12, 0xba, 0x06]);
        framed.extend_from_slice(CERT.as_bytes());

        let r = IdentityResolver::new(IdentityEncoding::Pem);
        assert_eq!(r.account_id(&framed).unwrap(), "01020304");
    }

    #[test]
    fn pem_identity_skips_broken_begin_line() {
        let mut bytes = b"-----BEGIN junk\n".to_vec();
        bytes.extend_from_slice(CERT.as_bytes());

        let r = IdentityResolver::new(IdentityEncoding::Pem);
        assert_eq!(r.account_id(&bytes).unwrap(), "01020304");
    }

    #[test]
    fn pem_identity_without_block_is_rejected() {
        let r = IdentityResolver::new(IdentityEncoding::Pem);
        assert_eq!(r.account_id(b"not a cert"), Err(IdentityError::MalformedPem));
        assert_eq!(
            r.account_id(b"-----BEGIN CERTIFICATE-----\nAQID\n-----END KEY-----\n"),
            Err(IdentityError::MalformedPem)
        );
    }

    #[test]
    fn same_bytes_same_key() {
        let r = IdentityResolver::default();
        let a = r.resolve(&HostIdentity::new(b"alice".to_vec())).unwrap();
        let b = r.resolve(&HostIdentity::new(b"alice".to_vec())).unwrap();
        let c = r.resolve(&HostIdentity::new(b"bob".to_vec())).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
