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

#![no_main]
#![forbid(unsafe_code)]

use amun_token::core::identity::{HostIdentity, IdentityResolver};
use amun_token::core::ledger::TokenEngine;
use amun_token::core::state::record_store::TokenRecordStore;
use amun_token::core::state::MemoryStore;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
struct Call {
    caller: Vec<u8>,
    op: String,
    args: Vec<String>,
}

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    calls: Vec<Call>,
}

fuzz_target!(|inp: Input| {
    let engine = TokenEngine::new(TokenRecordStore::default(), IdentityResolver::default());
    let mut store = MemoryStore::new();
    let seed = HostIdentity::new(b"seed".to_vec());
    let _ = engine.invoke(&mut store, &seed, "Initialize", &["Fuzz", "FZ", "1000000", "6"]);

    for call in inp.calls.iter().take(64) {
        let caller = HostIdentity::new(call.caller.clone());
        let _ = engine.invoke(&mut store, &caller, &call.op, call.args.as_slice());
    }

    // Whatever sequence ran, the stored supply still equals the sum of balances.
    if let Ok(Some(token)) = engine.records().load(&store) {
        assert!(token.is_conserved());
    }
});
