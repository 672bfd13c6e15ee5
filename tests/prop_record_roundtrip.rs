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

use proptest::prelude::*;

use amun_token::core::ledger::Token;
use amun_token::core::state::record_store::{RecordFormat, TokenRecordStore, DEFAULT_MAX_RECORD_BYTES};

fn arb_balance_key() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9a-f]{2,16}", "[a-zA-Z0-9 .-]{1,12}"]
}

fn arb_token() -> impl Strategy<Value = Token> {
    (
        ".{0,16}",
        ".{0,8}",
        any::<u64>(),
        any::<u8>(),
        prop::collection::btree_map(arb_balance_key(), any::<u64>(), 0..16),
        prop::collection::btree_map(
            ("[0-9a-f]{2,16}", "[a-z0-9_]{1,12}"),
            any::<u64>(),
            0..8,
        ),
    )
        .prop_map(|(name, symbol, total_supply, decimals, balances, allowances)| Token {
            name,
            symbol,
            total_supply,
            decimals,
            balances,
            allowances,
        })
}

proptest! {
    #[test]
    fn prop_record_round_trips_in_both_formats(token in arb_token()) {
        for format in [RecordFormat::Json, RecordFormat::Canonical] {
            let rs = TokenRecordStore::new("token", format, DEFAULT_MAX_RECORD_BYTES);
            let bytes = rs.encode(&token).unwrap();
            let back = rs.decode(&bytes).unwrap();
            prop_assert_eq!(&back, &token);
        }
    }
}
