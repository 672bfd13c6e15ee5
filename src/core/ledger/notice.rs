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

//! Informational notices handed to the host alongside a successful result.

use std::fmt;

use crate::core::types::Amount;

/// Notice name emitted by `Mint`.
pub const TRANSFER_NOTICE: &str = "Transfer";
/// Notice name emitted by `Approve`.
pub const APPROVAL_NOTICE: &str = "Approval";

/// Named fire-and-forget notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Notice name.
    pub name: &'static str,
    /// Human-readable payload.
    pub payload: String,
}

impl Notice {
    /// Notice for newly minted units.
    pub fn minted(amount: Amount, to: &str) -> Self {
        Self {
            name: TRANSFER_NOTICE,
            payload: format!("Minted {amount} tokens to {to}"),
        }
    }

    /// Notice for an allowance update.
    pub fn approved(amount: Amount, spender: &str) -> Self {
        Self {
            name: APPROVAL_NOTICE,
            payload: format!("Approved {amount} tokens to {spender}"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.payload)
    }
}
