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

use amun_token::core::identity::{hex_account_id, HostIdentity, IdentityResolver};
use amun_token::core::ledger::TokenEngine;
use amun_token::core::state::record_store::TokenRecordStore;
use amun_token::core::state::{LedgerStore, MemoryStore};
use proptest::prelude::*;

const PARTIES: [&str; 4] = ["alice", "bob", "carol", "dave"];
const SUPPLY: u64 = 10_000;

#[derive(Clone, Debug)]
enum Step {
    Transfer { from: usize, to: usize, amount: u64 },
    Approve { owner: usize, spender: usize, amount: u64 },
    TransferFrom { spender: usize, owner: usize, to: usize, amount: u64 },
}

fn arb_step() -> impl Strategy<Value = Step> {
    let party = 0..PARTIES.len();
    let amount = 0u64..4_000;
    prop_oneof![
        (party.clone(), party.clone(), amount.clone())
            .prop_map(|(from, to, amount)| Step::Transfer { from, to, amount }),
        (party.clone(), party.clone(), amount.clone())
            .prop_map(|(owner, spender, amount)| Step::Approve { owner, spender, amount }),
        (party.clone(), party.clone(), party, amount).prop_map(|(spender, owner, to, amount)| {
            Step::TransferFrom { spender, owner, to, amount }
        }),
    ]
}

fn caller(i: usize) -> HostIdentity {
    HostIdentity::new(PARTIES[i].as_bytes().to_vec())
}

fn key(i: usize) -> String {
    hex_account_id(PARTIES[i].as_bytes())
}

proptest! {
    #[test]
    fn prop_transfers_conserve_supply_and_failures_write_nothing(
        steps in prop::collection::vec(arb_step(), 1..40)
    ) {
        let engine = TokenEngine::new(TokenRecordStore::default(), IdentityResolver::default());
        let records = engine.records().clone();
        let mut store = MemoryStore::new();
        let supply = SUPPLY.to_string();
        engine
            .invoke(&mut store, &caller(0), "Initialize", &["Coin", "CN", supply.as_str(), "2"])
            .unwrap();

        for step in steps {
            let before = store.get(b"token").unwrap();
            let res = match &step {
                Step::Transfer { from, to, amount } => engine.invoke(
                    &mut store,
                    &caller(*from),
                    "Transfer",
                    &[key(*to), amount.to_string()],
                ),
                Step::Approve { owner, spender, amount } => engine.invoke(
                    &mut store,
                    &caller(*owner),
                    "Approve",
                    &[key(*spender), amount.to_string()],
                ),
                Step::TransferFrom { spender, owner, to, amount } => engine.invoke(
                    &mut store,
                    &caller(*spender),
                    "TransferFrom",
                    &[key(*owner), key(*to), amount.to_string()],
                ),
            };
            if res.is_err() {
                prop_assert_eq!(store.get(b"token").unwrap(), before, "{:?}", step);
            }

            let token = records.load_required(&store).unwrap();
            prop_assert_eq!(token.total_supply, SUPPLY);
            prop_assert_eq!(token.circulating(), SUPPLY as u128);
        }
    }

    #[test]
    fn prop_mint_keeps_supply_equal_to_balances(
        mints in prop::collection::vec((0..PARTIES.len(), 0u64..1_000_000), 1..20)
    ) {
        let engine = TokenEngine::new(TokenRecordStore::default(), IdentityResolver::default());
        let mut store = MemoryStore::new();
        engine
            .invoke(&mut store, &caller(0), "Initialize", &["Coin", "CN", "0", "0"])
            .unwrap();

        let mut expected: u64 = 0;
        for (who, amount) in mints {
            engine.invoke(&mut store, &caller(who), "Mint", &[amount.to_string()]).unwrap();
            expected += amount;
        }

        let token = engine.records().load_required(&store).unwrap();
        prop_assert_eq!(token.total_supply, expected);
        prop_assert!(token.is_conserved());
    }
}
