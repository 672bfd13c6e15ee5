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

//! Ledger operation failures.
//!
//! Every failure is terminal for the invocation: nothing is written and no notice is emitted.

use thiserror::Error;

use crate::core::identity::IdentityError;
use crate::core::types::{AccountId, Amount};

/// Stable classification of a [`LedgerError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong number of arguments.
    ArgumentCountMismatch,
    /// Numeric argument not parseable or out of range.
    ArgumentParseError,
    /// Account key argument unusable as a ledger key.
    InvalidAccountKey,
    /// Operation name not recognised.
    UnknownOperation,
    /// Caller identity missing.
    IdentityUnavailable,
    /// Token record absent.
    RecordNotFound,
    /// Token record present but undecodable.
    RecordDecodeError,
    /// Token record already present and reinitialisation disabled.
    AlreadyInitialized,
    /// Balance below requested amount.
    InsufficientBalance,
    /// Allowance below requested amount.
    InsufficientAllowance,
    /// No allowance recorded for the pair.
    AllowanceNotFound,
    /// No balance entry for the account.
    BalanceEntryNotFound,
    /// Amount arithmetic left the u64 range.
    ArithmeticOverflow,
    /// Ledger read failed.
    StoreReadFailure,
    /// Record encoding or ledger write failed.
    StoreWriteFailure,
}

/// Ledger operation error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Wrong number of arguments for the operation.
    #[error("incorrect number of arguments for {op}: expected {expected}, got {got}")]
    ArgumentCountMismatch {
        /// Operation name.
        op: &'static str,
        /// Expected argument names.
        expected: &'static str,
        /// Supplied count.
        got: usize,
    },
    /// Numeric argument rejected.
    #[error("invalid {arg}: {reason}")]
    ArgumentParse {
        /// Argument name.
        arg: &'static str,
        /// Parser message.
        reason: String,
    },
    /// Account key argument rejected.
    #[error("invalid {arg}: {reason}")]
    InvalidAccountKey {
        /// Argument name.
        arg: &'static str,
        /// Why the key is unusable.
        reason: &'static str,
    },
    /// Unknown operation name.
    #[error("invalid function name: {0}")]
    UnknownOperation(String),
    /// Caller identity missing or undecodable.
    #[error("caller identity unavailable: {0}")]
    IdentityUnavailable(IdentityError),
    /// No token record stored.
    #[error("token state does not exist")]
    RecordNotFound,
    /// Stored token record could not be decoded.
    #[error("failed to decode token state")]
    RecordDecode,
    /// Token already initialised and reinitialisation is disabled.
    #[error("token already initialized")]
    AlreadyInitialized,
    /// Balance too low.
    #[error("insufficient balance: account {account} holds {balance}, requested {requested}")]
    InsufficientBalance {
        /// Debited account.
        account: AccountId,
        /// Current balance.
        balance: Amount,
        /// Requested amount.
        requested: Amount,
    },
    /// Allowance too low.
    #[error("insufficient allowance: {spender} may spend {allowance} of {owner}, requested {requested}")]
    InsufficientAllowance {
        /// Owner account.
        owner: AccountId,
        /// Spender account.
        spender: AccountId,
        /// Current allowance.
        allowance: Amount,
        /// Requested amount.
        requested: Amount,
    },
    /// No allowance for the pair.
    #[error("no allowance found for owner {owner} and spender {spender}")]
    AllowanceNotFound {
        /// Owner account.
        owner: AccountId,
        /// Spender account.
        spender: AccountId,
    },
    /// No balance entry for the key.
    #[error("no balance found for address: {account}")]
    BalanceEntryNotFound {
        /// Queried account.
        account: AccountId,
    },
    /// Amount arithmetic overflowed.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    /// Ledger read failed.
    #[error("failed to read token state")]
    StoreReadFailure,
    /// Encoding or ledger write failed.
    #[error("failed to save token state: {0}")]
    StoreWriteFailure(String),
}

impl LedgerError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::ArgumentCountMismatch { .. } => ErrorKind::ArgumentCountMismatch,
            LedgerError::ArgumentParse { .. } => ErrorKind::ArgumentParseError,
            LedgerError::InvalidAccountKey { .. } => ErrorKind::InvalidAccountKey,
            LedgerError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            LedgerError::IdentityUnavailable(_) => ErrorKind::IdentityUnavailable,
            LedgerError::RecordNotFound => ErrorKind::RecordNotFound,
            LedgerError::RecordDecode => ErrorKind::RecordDecodeError,
            LedgerError::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::InsufficientAllowance { .. } => ErrorKind::InsufficientAllowance,
            LedgerError::AllowanceNotFound { .. } => ErrorKind::AllowanceNotFound,
            LedgerError::BalanceEntryNotFound { .. } => ErrorKind::BalanceEntryNotFound,
            LedgerError::ArithmeticOverflow => ErrorKind::ArithmeticOverflow,
            LedgerError::StoreReadFailure => ErrorKind::StoreReadFailure,
            LedgerError::StoreWriteFailure(_) => ErrorKind::StoreWriteFailure,
        }
    }
}

impl From<IdentityError> for LedgerError {
    fn from(e: IdentityError) -> Self {
        LedgerError::IdentityUnavailable(e)
    }
}
