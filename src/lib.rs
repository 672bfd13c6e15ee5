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

//! Amunchain token ledger - a single fungible-token record kept in a key-value ledger.
//!
//! This crate provides:
//! - Identity resolution from host-supplied caller bytes to hex account keys
//! - A token record store (JSON-compatible or canonical bincode) over a pluggable KV ledger
//! - Read-modify-write ledger operations (mint, transfer, approve, delegated transfer, queries)
//! - Persistent sled-backed state with atomic per-invocation commits
//! - Monitoring via Prometheus metrics and structured logging

/// Core ledger primitives (types, identity, state, operations, config).
pub mod core;
/// Observability (metrics, logging setup).
pub mod monitoring;
