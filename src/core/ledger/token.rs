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

//! The token aggregate: metadata, balances and allowances with checked arithmetic.
//!
//! Balances and allowances are kept in separate maps. Every mutator validates before it
//! writes, so a failed call leaves the aggregate as it was.

use serde::{Deserialize, Serialize};

use crate::core::ledger::errors::LedgerError;
use crate::core::types::{AccountId, Amount, CanonicalMap};

/// The single persisted token record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Human-readable name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Sum of all balances.
    pub total_supply: Amount,
    /// Display scale.
    pub decimals: u8,
    /// Account balances.
    pub balances: CanonicalMap<AccountId, Amount>,
    /// Spending allowances keyed by `(owner, spender)`.
    pub allowances: CanonicalMap<(AccountId, AccountId), Amount>,
}

impl Token {
    /// Fresh token with the whole supply credited to `holder`.
    pub fn genesis(
        name: impl Into<String>,
        symbol: impl Into<String>,
        total_supply: Amount,
        decimals: u8,
        holder: &str,
    ) -> Self {
        let mut balances = CanonicalMap::new();
        balances.insert(holder.to_string(), total_supply);
        Self {
            name: name.into(),
            symbol: symbol.into(),
            total_supply,
            decimals,
            balances,
            allowances: CanonicalMap::new(),
        }
    }

    /// Balance entry for `account`, if one exists.
    pub fn balance_of(&self, account: &str) -> Option<Amount> {
        self.balances.get(account).copied()
    }

    /// Allowance entry for `(owner, spender)`, if one exists.
    pub fn allowance(&self, owner: &str, spender: &str) -> Option<Amount> {
        self.allowances
            .get(&(owner.to_string(), spender.to_string()))
            .copied()
    }

    /// Create a zero balance entry for `account` if absent. Returns true if one was created.
    pub fn ensure_account(&mut self, account: &str) -> bool {
        if self.balances.contains_key(account) {
            return false;
        }
        self.balances.insert(account.to_string(), 0);
        true
    }

    /// Add newly issued units to `account` and to the total supply.
    pub fn mint(&mut self, account: &str, amount: Amount) -> Result<(), LedgerError> {
        let total = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let balance = self
            .balance_of(account)
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.total_supply = total;
        self.balances.insert(account.to_string(), balance);
        Ok(())
    }

    /// Move `amount` from `from` to `to`. An absent sender holds zero.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Amount) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from).unwrap_or(0);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.to_string(),
                balance: from_balance,
                requested: amount,
            });
        }
        if from == to {
            // Self-transfer still materialises the entry, as a debit then credit would.
            self.balances.insert(from.to_string(), from_balance);
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.balances.insert(from.to_string(), from_balance - amount);
        self.balances.insert(to.to_string(), to_balance);
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s balance (absolute, not additive).
    pub fn approve(&mut self, owner: &str, spender: &str, amount: Amount) {
        self.allowances
            .insert((owner.to_string(), spender.to_string()), amount);
    }

    /// Spend `amount` of `owner`'s balance on behalf of `spender`, crediting `to`.
    pub fn transfer_from(
        &mut self,
        owner: &str,
        spender: &str,
        to: &str,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let key = (owner.to_string(), spender.to_string());
        let allowance =
            self.allowances
                .get(&key)
                .copied()
                .ok_or_else(|| LedgerError::AllowanceNotFound {
                    owner: owner.to_string(),
                    spender: spender.to_string(),
                })?;
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: owner.to_string(),
                spender: spender.to_string(),
                allowance,
                requested: amount,
            });
        }
        self.transfer(owner, to, amount)?;
        self.allowances.insert(key, allowance - amount);
        Ok(())
    }

    /// Sum of all balance entries (allowances excluded).
    pub fn circulating(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum()
    }

    /// True if the recorded supply equals the sum of balances.
    pub fn is_conserved(&self) -> bool {
        self.circulating() == self.total_supply as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin() -> Token {
        Token::genesis("Coin", "CN", 1000, 2, "x")
    }

    #[test]
    fn failed_transfer_leaves_token_unchanged() {
        let mut t = coin();
        let before = t.clone();
        let err = t.transfer("x", "bob", 1001).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { balance: 1000, .. }));
        assert_eq!(t, before);
    }

    #[test]
    fn self_transfer_is_neutral() {
        let mut t = coin();
        t.transfer("x", "x", 400).unwrap();
        assert_eq!(t.balance_of("x"), Some(1000));
        assert!(t.is_conserved());
    }

    #[test]
    fn transfer_from_checks_allowance_before_balance() {
        let mut t = coin();
        t.approve("x", "carol", 5000);
        let before = t.clone();
        let err = t.transfer_from("x", "carol", "dave", 2000).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(t, before);

        let err = t.transfer_from("x", "mallory", "dave", 1).unwrap_err();
        assert!(matches!(err, LedgerError::AllowanceNotFound { .. }));
    }

    #[test]
    fn mint_overflow_is_rejected() {
        let mut t = Token::genesis("Coin", "CN", u64::MAX - 1, 0, "x");
        let before = t.clone();
        assert_eq!(t.mint("x", 2), Err(LedgerError::ArithmeticOverflow));
        assert_eq!(t, before);
        t.mint("x", 1).unwrap();
        assert_eq!(t.total_supply, u64::MAX);
    }

    #[test]
    fn ensure_account_creates_zero_entry_once() {
        let mut t = coin();
        assert!(t.ensure_account("new"));
        assert!(!t.ensure_account("new"));
        assert_eq!(t.balance_of("new"), Some(0));
        assert!(t.is_conserved());
    }
}
