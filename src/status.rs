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

//! Stock status classification.
//!
//! [`classify`] is a total, side-effect-free function from an item's
//! quantity, minimum threshold and expiry to its [`StockStatus`]. Callers
//! never set a status directly; the ledger recomputes it inside the same
//! critical section as any mutation that could affect it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived classification of a stock item, used for alerting and display.
///
/// Serialized with the wire labels the inventory UI expects
/// (`"In Stock"`, `"Low Stock"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Expired")]
    Expired,
}

impl StockStatus {
    /// Parses a wire label back into a status. Returns `None` for
    /// anything else, letting callers decide between "no filter" and 400.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "In Stock" => Some(Self::InStock),
            "Low Stock" => Some(Self::LowStock),
            "Out of Stock" => Some(Self::OutOfStock),
            "Expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
            Self::Expired => "Expired",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derives an item's status from its quantity, minimum threshold and expiry.
///
/// Precedence, first match wins:
///
/// 1. expiry set and in the past -> `Expired` (overrides any quantity)
/// 2. quantity zero -> `OutOfStock`
/// 3. quantity at or below minimum -> `LowStock`
/// 4. otherwise -> `InStock`
///
/// The maximum threshold is informational only and never affects status.
pub fn classify(
    quantity: u32,
    minimum_stock: u32,
    expiry_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StockStatus {
    if expiry_date.is_some_and(|expiry| expiry < now) {
        StockStatus::Expired
    } else if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= minimum_stock {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn ample_stock_is_in_stock() {
        let now = Utc::now();
        assert_eq!(classify(100, 10, None, now), StockStatus::InStock);
    }

    #[test]
    fn at_minimum_is_low_stock() {
        let now = Utc::now();
        assert_eq!(classify(10, 10, None, now), StockStatus::LowStock);
        assert_eq!(classify(1, 10, None, now), StockStatus::LowStock);
    }

    #[test]
    fn just_above_minimum_is_in_stock() {
        let now = Utc::now();
        assert_eq!(classify(11, 10, None, now), StockStatus::InStock);
    }

    #[test]
    fn zero_quantity_is_out_of_stock() {
        let now = Utc::now();
        assert_eq!(classify(0, 10, None, now), StockStatus::OutOfStock);
        // Out-of-stock wins over low-stock even with a zero minimum
        assert_eq!(classify(0, 0, None, now), StockStatus::OutOfStock);
    }

    #[test]
    fn zero_minimum_with_stock_is_in_stock() {
        let now = Utc::now();
        assert_eq!(classify(1, 0, None, now), StockStatus::InStock);
    }

    #[test]
    fn past_expiry_overrides_ample_stock() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);
        assert_eq!(classify(50, 5, Some(yesterday), now), StockStatus::Expired);
    }

    #[test]
    fn past_expiry_overrides_out_of_stock() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);
        assert_eq!(classify(0, 5, Some(yesterday), now), StockStatus::Expired);
    }

    #[test]
    fn future_expiry_does_not_affect_status() {
        let now = Utc::now();
        let next_month = now + Duration::days(30);
        assert_eq!(classify(50, 5, Some(next_month), now), StockStatus::InStock);
        assert_eq!(classify(0, 5, Some(next_month), now), StockStatus::OutOfStock);
    }

    #[test]
    fn expiry_exactly_now_is_not_expired() {
        let now = Utc::now();
        // Strict `<`: an item expiring this instant is still usable
        assert_eq!(classify(50, 5, Some(now), now), StockStatus::InStock);
    }

    #[test]
    fn labels_round_trip() {
        for status in [
            StockStatus::InStock,
            StockStatus::LowStock,
            StockStatus::OutOfStock,
            StockStatus::Expired,
        ] {
            assert_eq!(StockStatus::parse(status.label()), Some(status));
        }
        assert_eq!(StockStatus::parse("Discontinued"), None);
    }
}
