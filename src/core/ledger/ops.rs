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

//! The closed set of ledger operations and their parsing from `(name, args)`.
//!
//! Argument checks happen here, before any state is read: arity first, then numeric
//! arguments, then account keys.

use std::fmt;

use crate::core::ledger::errors::LedgerError;
use crate::core::types::{AccountId, Amount};

/// Operation tag, without arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Create or reset the token record.
    Initialize,
    /// Issue new units to the caller.
    Mint,
    /// Caller's balance, creating a zero entry if absent.
    ClientAccountBalance,
    /// Caller's account key.
    ClientAccountId,
    /// Move units from the caller.
    Transfer,
    /// Set a spender allowance over the caller's balance.
    Approve,
    /// Read an allowance.
    Allowance,
    /// Spend an allowance granted to the caller.
    TransferFrom,
    /// Read a balance entry.
    BalanceOf,
    /// Token name.
    Name,
    /// Token symbol.
    Symbol,
    /// Total supply.
    TotalSupply,
    /// Display decimals.
    Decimals,
}

impl OpCode {
    /// Every operation, in dispatch-table order.
    pub const ALL: [OpCode; 13] = [
        OpCode::Initialize,
        OpCode::Mint,
        OpCode::ClientAccountBalance,
        OpCode::ClientAccountId,
        OpCode::Transfer,
        OpCode::Approve,
        OpCode::Allowance,
        OpCode::TransferFrom,
        OpCode::BalanceOf,
        OpCode::Name,
        OpCode::Symbol,
        OpCode::TotalSupply,
        OpCode::Decimals,
    ];

    /// Canonical operation name.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Initialize => "Initialize",
            OpCode::Mint => "Mint",
            OpCode::ClientAccountBalance => "ClientAccountBalance",
            OpCode::ClientAccountId => "ClientAccountID",
            OpCode::Transfer => "Transfer",
            OpCode::Approve => "Approve",
            OpCode::Allowance => "Allowance",
            OpCode::TransferFrom => "TransferFrom",
            OpCode::BalanceOf => "BalanceOf",
            OpCode::Name => "Name",
            OpCode::Symbol => "Symbol",
            OpCode::TotalSupply => "TotalSupply",
            OpCode::Decimals => "Decimals",
        }
    }

    /// Resolve a canonical name or one of the lower-camel aliases used by deployed clients.
    pub fn from_name(name: &str) -> Option<OpCode> {
        let op = match name {
            "Initialize" => OpCode::Initialize,
            "Mint" => OpCode::Mint,
            "ClientAccountBalance" => OpCode::ClientAccountBalance,
            "ClientAccountID" => OpCode::ClientAccountId,
            "Transfer" | "transfer" => OpCode::Transfer,
            "Approve" => OpCode::Approve,
            "Allowance" => OpCode::Allowance,
            "TransferFrom" | "transferFrom" => OpCode::TransferFrom,
            "BalanceOf" | "balanceOf" => OpCode::BalanceOf,
            "Name" | "name" => OpCode::Name,
            "Symbol" | "symbol" => OpCode::Symbol,
            "TotalSupply" | "totalSupply" => OpCode::TotalSupply,
            "Decimals" | "decimals" => OpCode::Decimals,
            _ => return None,
        };
        Some(op)
    }

    /// Argument names, comma separated.
    fn expected_args(self) -> &'static str {
        match self {
            OpCode::Initialize => "name, symbol, total supply, decimals",
            OpCode::Mint => "amount",
            OpCode::Transfer => "recipient, amount",
            OpCode::Approve => "spender, amount",
            OpCode::Allowance => "owner, spender",
            OpCode::TransferFrom => "owner, recipient, amount",
            OpCode::BalanceOf => "account",
            OpCode::ClientAccountBalance
            | OpCode::ClientAccountId
            | OpCode::Name
            | OpCode::Symbol
            | OpCode::TotalSupply
            | OpCode::Decimals => "none",
        }
    }

    fn arity(self) -> usize {
        match self {
            OpCode::Initialize => 4,
            OpCode::TransferFrom => 3,
            OpCode::Transfer | OpCode::Approve | OpCode::Allowance => 2,
            OpCode::Mint | OpCode::BalanceOf => 1,
            OpCode::ClientAccountBalance
            | OpCode::ClientAccountId
            | OpCode::Name
            | OpCode::Symbol
            | OpCode::TotalSupply
            | OpCode::Decimals => 0,
        }
    }

    /// True if a successful call writes the token record.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            OpCode::Initialize
                | OpCode::Mint
                | OpCode::ClientAccountBalance
                | OpCode::Transfer
                | OpCode::Approve
                | OpCode::TransferFrom
        )
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully parsed ledger operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Create (or reset) the record, crediting the whole supply to the caller.
    Initialize {
        /// Token name.
        name: String,
        /// Token symbol.
        symbol: String,
        /// Initial supply.
        total_supply: Amount,
        /// Display decimals.
        decimals: u8,
    },
    /// Issue `amount` to the caller.
    Mint {
        /// Units to issue.
        amount: Amount,
    },
    /// Caller's balance; creates a zero entry when absent.
    ClientAccountBalance,
    /// Caller's resolved account key.
    ClientAccountId,
    /// Move `amount` from the caller to `recipient`.
    Transfer {
        /// Credited account key.
        recipient: AccountId,
        /// Units moved.
        amount: Amount,
    },
    /// Set `spender`'s allowance over the caller's balance.
    Approve {
        /// Spender account key.
        spender: AccountId,
        /// New allowance.
        amount: Amount,
    },
    /// Read `spender`'s allowance over `owner`'s balance.
    Allowance {
        /// Owner account key.
        owner: AccountId,
        /// Spender account key.
        spender: AccountId,
    },
    /// Caller spends its allowance over `owner`, crediting `recipient`.
    TransferFrom {
        /// Debited account key.
        owner: AccountId,
        /// Credited account key.
        recipient: AccountId,
        /// Units moved.
        amount: Amount,
    },
    /// Read the balance entry of `account`.
    BalanceOf {
        /// Queried account key.
        account: AccountId,
    },
    /// Token name.
    Name,
    /// Token symbol.
    Symbol,
    /// Total supply.
    TotalSupply,
    /// Display decimals.
    Decimals,
}

impl Operation {
    /// Parse an operation from its name and positional string arguments.
    pub fn parse<A: AsRef<str>>(name: &str, args: &[A]) -> Result<Operation, LedgerError> {
        let code =
            OpCode::from_name(name).ok_or_else(|| LedgerError::UnknownOperation(name.to_string()))?;
        if args.len() != code.arity() {
            return Err(LedgerError::ArgumentCountMismatch {
                op: code.name(),
                expected: code.expected_args(),
                got: args.len(),
            });
        }
        let arg = |i: usize| args[i].as_ref();

        let op = match code {
            OpCode::Initialize => Operation::Initialize {
                name: arg(0).to_string(),
                symbol: arg(1).to_string(),
                total_supply: parse_amount("total supply", arg(2))?,
                decimals: parse_decimals(arg(3))?,
            },
            OpCode::Mint => Operation::Mint {
                amount: parse_amount("amount", arg(0))?,
            },
            OpCode::ClientAccountBalance => Operation::ClientAccountBalance,
            OpCode::ClientAccountId => Operation::ClientAccountId,
            OpCode::Transfer => {
                let amount = parse_amount("amount", arg(1))?;
                Operation::Transfer {
                    recipient: account_key("recipient", arg(0))?,
                    amount,
                }
            }
            OpCode::Approve => {
                let amount = parse_amount("amount", arg(1))?;
                Operation::Approve {
                    spender: account_key("spender", arg(0))?,
                    amount,
                }
            }
            OpCode::Allowance => Operation::Allowance {
                owner: account_key("owner", arg(0))?,
                spender: account_key("spender", arg(1))?,
            },
            OpCode::TransferFrom => {
                let amount = parse_amount("amount", arg(2))?;
                Operation::TransferFrom {
                    owner: account_key("owner", arg(0))?,
                    recipient: account_key("recipient", arg(1))?,
                    amount,
                }
            }
            OpCode::BalanceOf => Operation::BalanceOf {
                account: account_key("account", arg(0))?,
            },
            OpCode::Name => Operation::Name,
            OpCode::Symbol => Operation::Symbol,
            OpCode::TotalSupply => Operation::TotalSupply,
            OpCode::Decimals => Operation::Decimals,
        };
        Ok(op)
    }

    /// Tag of this operation.
    pub fn code(&self) -> OpCode {
        match self {
            Operation::Initialize { .. } => OpCode::Initialize,
            Operation::Mint { .. } => OpCode::Mint,
            Operation::ClientAccountBalance => OpCode::ClientAccountBalance,
            Operation::ClientAccountId => OpCode::ClientAccountId,
            Operation::Transfer { .. } => OpCode::Transfer,
            Operation::Approve { .. } => OpCode::Approve,
            Operation::Allowance { .. } => OpCode::Allowance,
            Operation::TransferFrom { .. } => OpCode::TransferFrom,
            Operation::BalanceOf { .. } => OpCode::BalanceOf,
            Operation::Name => OpCode::Name,
            Operation::Symbol => OpCode::Symbol,
            Operation::TotalSupply => OpCode::TotalSupply,
            Operation::Decimals => OpCode::Decimals,
        }
    }
}

fn digits_only(arg: &'static str, s: &str) -> Result<(), LedgerError> {
    if s.is_empty() {
        return Err(LedgerError::ArgumentParse {
            arg,
            reason: "empty value".to_string(),
        });
    }
    // `u64::from_str` accepts a leading '+'; amounts are bare decimal digits.
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::ArgumentParse {
            arg,
            reason: format!("{s:?} is not an unsigned decimal integer"),
        });
    }
    Ok(())
}

/// Parse an unsigned 64-bit amount.
pub fn parse_amount(arg: &'static str, s: &str) -> Result<Amount, LedgerError> {
    digits_only(arg, s)?;
    s.parse::<Amount>().map_err(|_| LedgerError::ArgumentParse {
        arg,
        reason: format!("{s:?} is out of range for u64"),
    })
}

fn parse_decimals(s: &str) -> Result<u8, LedgerError> {
    digits_only("decimals", s)?;
    s.parse::<u8>().map_err(|_| LedgerError::ArgumentParse {
        arg: "decimals",
        reason: format!("{s:?} is out of range for u8"),
    })
}

fn account_key(arg: &'static str, s: &str) -> Result<AccountId, LedgerError> {
    if s.is_empty() {
        return Err(LedgerError::InvalidAccountKey {
            arg,
            reason: "must be a non-empty string",
        });
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::errors::ErrorKind;

    fn kind(name: &str, args: &[&str]) -> ErrorKind {
        Operation::parse(name, args).unwrap_err().kind()
    }

    #[test]
    fn every_canonical_name_round_trips() {
        for code in OpCode::ALL {
            assert_eq!(OpCode::from_name(code.name()), Some(code));
        }
        assert_eq!(OpCode::from_name("balanceOf"), Some(OpCode::BalanceOf));
        assert_eq!(OpCode::from_name("mint"), None);
    }

    #[test]
    fn parses_initialize() {
        let op = Operation::parse("Initialize", &["Coin", "CN", "1000", "2"]).unwrap();
        assert_eq!(
            op,
            Operation::Initialize {
                name: "Coin".into(),
                symbol: "CN".into(),
                total_supply: 1000,
                decimals: 2,
            }
        );
    }

    #[test]
    fn arity_is_checked_first() {
        assert_eq!(kind("Transfer", &["bob"]), ErrorKind::ArgumentCountMismatch);
        assert_eq!(kind("Name", &["extra"]), ErrorKind::ArgumentCountMismatch);
        assert_eq!(kind("Initialize", &["a", "b", "x"]), ErrorKind::ArgumentCountMismatch);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(kind("Mint", &["-5"]), ErrorKind::ArgumentParseError);
        assert_eq!(kind("Mint", &["+5"]), ErrorKind::ArgumentParseError);
        assert_eq!(kind("Mint", &["12a"]), ErrorKind::ArgumentParseError);
        assert_eq!(kind("Mint", &[""]), ErrorKind::ArgumentParseError);
        assert_eq!(kind("Mint", &["18446744073709551616"]), ErrorKind::ArgumentParseError);
        assert_eq!(kind("Initialize", &["a", "b", "1", "256"]), ErrorKind::ArgumentParseError);
        assert!(Operation::parse("Mint", &["18446744073709551615"]).is_ok());
    }

    #[test]
    fn rejects_empty_account_keys() {
        assert_eq!(kind("BalanceOf", &[""]), ErrorKind::InvalidAccountKey);
        assert_eq!(kind("TransferFrom", &["", "c", "1"]), ErrorKind::InvalidAccountKey);
        assert_eq!(kind("Allowance", &["ab", ""]), ErrorKind::InvalidAccountKey);
    }

    #[test]
    fn account_keys_are_opaque_labels() {
        assert!(Operation::parse("Transfer", &["bob_smith", "1"]).is_ok());
        assert!(Operation::parse("BalanceOf", &["ab_cd"]).is_ok());
        assert!(Operation::parse("Approve", &["team_ops", "1"]).is_ok());
    }

    #[test]
    fn unknown_name() {
        assert_eq!(kind("Burn", &["1"]), ErrorKind::UnknownOperation);
    }
}
