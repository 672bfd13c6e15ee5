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

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Operations executed (success or failure).
    pub ops_total: IntCounter,
    /// Operations that returned an error.
    pub ops_failed_total: IntCounter,
    /// Successful record writes.
    pub mutations_total: IntCounter,
    /// Units issued through `Mint`.
    pub minted_total: IntCounter,
    /// Total supply after the last successful write.
    pub total_supply: IntGauge,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let ops_total = IntCounter::new("amun_token_ops_total", "Ledger operations executed")
            .map_err(|_| MetricsError::Prom)?;
        let ops_failed_total =
            IntCounter::new("amun_token_ops_failed_total", "Ledger operations rejected")
                .map_err(|_| MetricsError::Prom)?;
        let mutations_total =
            IntCounter::new("amun_token_mutations_total", "Token record writes")
                .map_err(|_| MetricsError::Prom)?;
        let minted_total = IntCounter::new("amun_token_minted_total", "Units issued by Mint")
            .map_err(|_| MetricsError::Prom)?;
        let total_supply = IntGauge::new("amun_token_total_supply", "Recorded total supply")
            .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(ops_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(ops_failed_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(mutations_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(minted_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(total_supply.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            ops_total,
            ops_failed_total,
            mutations_total,
            minted_total,
            total_supply,
        })
    }

    /// Record the supply after a write. The gauge saturates at `i64::MAX`.
    pub fn set_total_supply(&self, supply: u64) {
        self.total_supply
            .set(i64::try_from(supply).unwrap_or(i64::MAX));
    }

    /// Prometheus text exposition of all registered metrics.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|_| MetricsError::Prom)?;
        String::from_utf8(buf).map_err(|_| MetricsError::Prom)
    }
}
