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

//! Token engine: executes one ledger operation per invocation.
//!
//! Every handler follows the same cycle: resolve the caller (if needed), load the whole
//! record, validate and mutate an in-memory copy, then write the whole record back. A
//! failure at any step returns before the write, so the stored record is never partially
//! updated. The engine holds no ledger state between invocations.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config::LedgerConfig;
use crate::core::identity::{IdentityResolver, IdentitySource};
use crate::core::ledger::errors::LedgerError;
use crate::core::ledger::notice::Notice;
use crate::core::ledger::ops::Operation;
use crate::core::ledger::token::Token;
use crate::core::state::overlay::WriteOverlay;
use crate::core::state::persistent_state::LedgerStore;
use crate::core::state::record_store::TokenRecordStore;
use crate::core::types::{AccountId, Amount};
use crate::monitoring::metrics::Metrics;

/// Successful operation result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// String-encoded value, `None` for a bare success.
    pub payload: Option<String>,
    /// Informational notice for the host event channel.
    pub notice: Option<Notice>,
}

impl Response {
    /// Success without a value.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Success carrying a value.
    pub fn value(v: impl Into<String>) -> Self {
        Self {
            payload: Some(v.into()),
            notice: None,
        }
    }

    /// Attach a notice.
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Ledger operations engine.
#[derive(Clone)]
pub struct TokenEngine {
    records: TokenRecordStore,
    identity: IdentityResolver,
    allow_reinitialize: bool,
    metrics: Option<Arc<Metrics>>,
}

impl TokenEngine {
    /// Engine over the given record store and identity resolver. Reinitialisation is allowed.
    pub fn new(records: TokenRecordStore, identity: IdentityResolver) -> Self {
        Self {
            records,
            identity,
            allow_reinitialize: true,
            metrics: None,
        }
    }

    /// Engine configured from a [`LedgerConfig`].
    pub fn from_config(cfg: &LedgerConfig) -> Self {
        let records = TokenRecordStore::new(
            &cfg.store.record_key,
            cfg.store.record_format,
            cfg.store.max_record_bytes,
        );
        Self::new(records, IdentityResolver::new(cfg.identity.encoding))
            .with_reinitialize(cfg.policy.allow_reinitialize)
    }

    /// Permit or reject `Initialize` over an existing record.
    pub fn with_reinitialize(mut self, allow: bool) -> Self {
        self.allow_reinitialize = allow;
        self
    }

    /// Report into the given metrics.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Record store in use.
    pub fn records(&self) -> &TokenRecordStore {
        &self.records
    }

    /// Run one named operation inside a write overlay and commit it to `store` on success.
    ///
    /// This is the host entry point: nothing reaches `store` unless the whole operation
    /// succeeded, and the buffered writes are applied as one batch.
    pub fn invoke<S: LedgerStore, A: AsRef<str>>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        name: &str,
        args: &[A],
    ) -> Result<Response, LedgerError> {
        let (resp, ops) = {
            let mut overlay = WriteOverlay::new(&*store);
            let resp = self.dispatch(&mut overlay, caller, name, args)?;
            (resp, overlay.into_ops())
        };
        store
            .apply(ops)
            .map_err(|e| LedgerError::StoreWriteFailure(e.to_string()))?;
        Ok(resp)
    }

    /// Parse and execute one named operation directly against `store`.
    pub fn dispatch<S: LedgerStore, A: AsRef<str>>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        name: &str,
        args: &[A],
    ) -> Result<Response, LedgerError> {
        let op = match Operation::parse(name, args) {
            Ok(op) => op,
            Err(e) => {
                self.count(false);
                warn!(op = name, kind = ?e.kind(), error = %e, "operation rejected");
                return Err(e);
            }
        };
        self.execute(store, caller, op)
    }

    /// Execute a parsed operation directly against `store`.
    pub fn execute<S: LedgerStore>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        op: Operation,
    ) -> Result<Response, LedgerError> {
        let code = op.code();
        let res = match op {
            Operation::Initialize {
                name,
                symbol,
                total_supply,
                decimals,
            } => self.initialize(store, caller, name, symbol, total_supply, decimals),
            Operation::Mint { amount } => self.mint(store, caller, amount),
            Operation::ClientAccountBalance => self.client_account_balance(store, caller),
            Operation::ClientAccountId => self.client_account_id(caller),
            Operation::Transfer { recipient, amount } => {
                self.transfer(store, caller, &recipient, amount)
            }
            Operation::Approve { spender, amount } => self.approve(store, caller, &spender, amount),
            Operation::Allowance { owner, spender } => self.allowance(store, &owner, &spender),
            Operation::TransferFrom {
                owner,
                recipient,
                amount,
            } => self.transfer_from(store, caller, &owner, &recipient, amount),
            Operation::BalanceOf { account } => self.balance_of(store, &account),
            Operation::Name => self.read(store, |t| t.name.clone()),
            Operation::Symbol => self.read(store, |t| t.symbol.clone()),
            Operation::TotalSupply => self.read(store, |t| t.total_supply.to_string()),
            Operation::Decimals => self.read(store, |t| t.decimals.to_string()),
        };

        self.count(res.is_ok());
        match &res {
            Ok(_) if code.is_mutating() => info!(op = %code, "operation applied"),
            Ok(_) => debug!(op = %code, "query served"),
            Err(e) => warn!(op = %code, kind = ?e.kind(), error = %e, "operation rejected"),
        }
        res
    }

    fn count(&self, ok: bool) {
        if let Some(m) = &self.metrics {
            m.ops_total.inc();
            if !ok {
                m.ops_failed_total.inc();
            }
        }
    }

    fn caller_id(&self, caller: &dyn IdentitySource) -> Result<AccountId, LedgerError> {
        Ok(self.identity.resolve(caller)?)
    }

    fn save<S: LedgerStore>(&self, store: &mut S, token: &Token) -> Result<(), LedgerError> {
        self.records.save(store, token)?;
        if let Some(m) = &self.metrics {
            m.mutations_total.inc();
            m.set_total_supply(token.total_supply);
        }
        Ok(())
    }

    fn initialize<S: LedgerStore>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        name: String,
        symbol: String,
        total_supply: Amount,
        decimals: u8,
    ) -> Result<Response, LedgerError> {
        let owner = self.caller_id(caller)?;
        if !self.allow_reinitialize && self.records.exists(store)? {
            return Err(LedgerError::AlreadyInitialized);
        }
        let token = Token::genesis(name, symbol, total_supply, decimals, &owner);
        self.save(store, &token)?;
        info!(
            name = %token.name,
            symbol = %token.symbol,
            total_supply,
            decimals,
            owner = %owner,
            "token initialized"
        );
        Ok(Response::ok())
    }

    fn mint<S: LedgerStore>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        amount: Amount,
    ) -> Result<Response, LedgerError> {
        let minter = self.caller_id(caller)?;
        let mut token = self.records.load_required(store)?;
        token.mint(&minter, amount)?;
        self.save(store, &token)?;
        if let Some(m) = &self.metrics {
            m.minted_total.inc_by(amount);
        }
        Ok(Response::ok().with_notice(Notice::minted(amount, &minter)))
    }

    /// Unlike `BalanceOf`, an absent caller entry is created at zero and persisted.
    fn client_account_balance<S: LedgerStore>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
    ) -> Result<Response, LedgerError> {
        let account = self.caller_id(caller)?;
        let mut token = self.records.load_required(store)?;
        if token.ensure_account(&account) {
            self.save(store, &token)?;
            debug!(account = %account, "created zero balance entry");
        }
        let balance = token.balance_of(&account).unwrap_or(0);
        Ok(Response::value(balance.to_string()))
    }

    fn client_account_id(&self, caller: &dyn IdentitySource) -> Result<Response, LedgerError> {
        Ok(Response::value(self.caller_id(caller)?))
    }

    fn transfer<S: LedgerStore>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        recipient: &str,
        amount: Amount,
    ) -> Result<Response, LedgerError> {
        self.records.check_balance_key("recipient", recipient)?;
        let sender = self.caller_id(caller)?;
        let mut token = self.records.load_required(store)?;
        token.transfer(&sender, recipient, amount)?;
        self.save(store, &token)?;
        Ok(Response::ok())
    }

    fn approve<S: LedgerStore>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        spender: &str,
        amount: Amount,
    ) -> Result<Response, LedgerError> {
        let owner = self.caller_id(caller)?;
        let mut token = self.records.load_required(store)?;
        token.approve(&owner, spender, amount);
        self.save(store, &token)?;
        Ok(Response::ok().with_notice(Notice::approved(amount, spender)))
    }

    fn allowance<S: LedgerStore>(
        &self,
        store: &S,
        owner: &str,
        spender: &str,
    ) -> Result<Response, LedgerError> {
        self.records.check_balance_key("owner", owner)?;
        let token = self.records.load_required(store)?;
        let allowance =
            token
                .allowance(owner, spender)
                .ok_or_else(|| LedgerError::AllowanceNotFound {
                    owner: owner.to_string(),
                    spender: spender.to_string(),
                })?;
        Ok(Response::value(allowance.to_string()))
    }

    /// The caller is the spender; the allowance consulted is `owner_caller`.
    fn transfer_from<S: LedgerStore>(
        &self,
        store: &mut S,
        caller: &dyn IdentitySource,
        owner: &str,
        recipient: &str,
        amount: Amount,
    ) -> Result<Response, LedgerError> {
        self.records.check_balance_key("owner", owner)?;
        self.records.check_balance_key("recipient", recipient)?;
        let spender = self.caller_id(caller)?;
        let mut token = self.records.load_required(store)?;
        token.transfer_from(owner, &spender, recipient, amount)?;
        self.save(store, &token)?;
        Ok(Response::ok())
    }

    /// Absent entries are an error here; there is no implicit zero.
    fn balance_of<S: LedgerStore>(&self, store: &S, account: &str) -> Result<Response, LedgerError> {
        self.records.check_balance_key("account", account)?;
        let token = self.records.load_required(store)?;
        let balance = token
            .balance_of(account)
            .ok_or_else(|| LedgerError::BalanceEntryNotFound {
                account: account.to_string(),
            })?;
        Ok(Response::value(balance.to_string()))
    }

    fn read<S: LedgerStore>(
        &self,
        store: &S,
        field: impl FnOnce(&Token) -> String,
    ) -> Result<Response, LedgerError> {
        let token = self.records.load_required(store)?;
        Ok(Response::value(field(&token)))
    }
}
