// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Stock movement records.
//!
//! Every successful adjustment appends exactly one [`StockMovement`] to the
//! item's log. Records are never edited or removed once committed; the
//! current quantity is the fold of the log over the initial quantity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a stock movement. The sign of an adjustment delta is
/// carried here; `quantity_delta` itself stays positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Stock received (delivery, return, correction upwards).
    Receipt,
    /// Stock consumed (usage, write-off, correction downwards).
    Consumption,
}

impl MovementKind {
    /// Kind implied by the sign of a non-zero adjustment delta.
    pub fn from_delta(delta: i64) -> Self {
        if delta > 0 {
            Self::Receipt
        } else {
            Self::Consumption
        }
    }
}

/// One committed quantity change on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub kind: MovementKind,
    /// Magnitude of the change; always positive, sign implied by `kind`.
    pub quantity_delta: u32,
    /// Free-text justification supplied by the operator. Required.
    pub reason: String,
    /// Identity of the operator performing the change.
    pub actor: String,
    /// Assigned by the ledger at commit time; monotonically non-decreasing
    /// within one item's log.
    pub timestamp: DateTime<Utc>,
}

impl StockMovement {
    /// The movement's effect on quantity with its sign restored.
    pub fn signed_delta(&self) -> i64 {
        match self.kind {
            MovementKind::Receipt => i64::from(self.quantity_delta),
            MovementKind::Consumption => -i64::from(self.quantity_delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_delta_sign() {
        assert_eq!(MovementKind::from_delta(5), MovementKind::Receipt);
        assert_eq!(MovementKind::from_delta(-5), MovementKind::Consumption);
    }

    #[test]
    fn signed_delta_restores_sign() {
        let receipt = StockMovement {
            kind: MovementKind::Receipt,
            quantity_delta: 7,
            reason: "delivery".into(),
            actor: "storekeeper".into(),
            timestamp: Utc::now(),
        };
        assert_eq!(receipt.signed_delta(), 7);

        let consumption = StockMovement {
            kind: MovementKind::Consumption,
            ..receipt
        };
        assert_eq!(consumption.signed_delta(), -7);
    }
}
