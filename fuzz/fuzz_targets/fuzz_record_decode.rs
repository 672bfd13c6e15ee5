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

use amun_token::core::state::record_store::{RecordFormat, TokenRecordStore};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding untrusted record bytes must fail cleanly, never panic or over-allocate.
    for format in [RecordFormat::Json, RecordFormat::Canonical] {
        let rs = TokenRecordStore::new("token", format, 64 * 1024);
        if let Ok(token) = rs.decode(data) {
            let _ = rs.encode(&token);
        }
    }
});
