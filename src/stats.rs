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

//! Fleet-wide inventory statistics.
//!
//! Stateless read path: every call scans a fresh listing of the directory
//! and folds it into counters. Nothing here is cached; the staleness
//! window is whatever the caller's polling interval is.

use crate::directory::InventoryDirectory;
use crate::item::ItemSnapshot;
use crate::status::StockStatus;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default warning horizon for expiring items.
pub const DEFAULT_EXPIRY_HORIZON_DAYS: i64 = 30;

/// Headline numbers for the inventory dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: usize,
    /// Items classified `InStock`.
    pub available_items: usize,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    /// Sum of quantity x unit price over all items, rounded to cents.
    pub total_value: Decimal,
    /// Items expiring within the horizon but not yet expired.
    pub expiring_items: usize,
}

impl InventoryStats {
    /// Collects statistics with the default 30-day expiry horizon.
    pub fn collect(directory: &InventoryDirectory, now: DateTime<Utc>) -> Self {
        Self::collect_with_horizon(directory, now, Duration::days(DEFAULT_EXPIRY_HORIZON_DAYS))
    }

    pub fn collect_with_horizon(
        directory: &InventoryDirectory,
        now: DateTime<Utc>,
        horizon: Duration,
    ) -> Self {
        let items = directory.snapshots();
        let mut stats = Self {
            total_items: items.len(),
            available_items: 0,
            low_stock_items: 0,
            out_of_stock_items: 0,
            total_value: Decimal::ZERO,
            expiring_items: 0,
        };
        for item in &items {
            match item.status {
                StockStatus::InStock => stats.available_items += 1,
                StockStatus::LowStock => stats.low_stock_items += 1,
                StockStatus::OutOfStock => stats.out_of_stock_items += 1,
                StockStatus::Expired => {}
            }
            stats.total_value += item.stock_value();
            if item.expires_within(now, horizon) {
                stats.expiring_items += 1;
            }
        }
        stats.total_value = stats.total_value.round_dp(2);
        stats
    }
}

/// Per-category rollup for the analytics view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub total_items: usize,
    pub total_value: Decimal,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

/// Groups the directory by category, sorted by category name.
pub fn by_category(directory: &InventoryDirectory) -> Vec<CategoryStats> {
    let mut groups: BTreeMap<String, CategoryStats> = BTreeMap::new();
    for item in directory.snapshots() {
        let entry = groups
            .entry(item.category.clone())
            .or_insert_with(|| CategoryStats {
                category: item.category.clone(),
                total_items: 0,
                total_value: Decimal::ZERO,
                low_stock_count: 0,
                out_of_stock_count: 0,
            });
        entry.total_items += 1;
        entry.total_value += item.stock_value();
        match item.status {
            StockStatus::LowStock => entry.low_stock_count += 1,
            StockStatus::OutOfStock => entry.out_of_stock_count += 1,
            _ => {}
        }
    }
    groups
        .into_values()
        .map(|mut group| {
            group.total_value = group.total_value.round_dp(2);
            group
        })
        .collect()
}

/// Items whose expiry falls within `days` from now, soonest first.
pub fn expiring_items(
    directory: &InventoryDirectory,
    now: DateTime<Utc>,
    days: i64,
) -> Vec<ItemSnapshot> {
    let horizon = Duration::days(days);
    let mut items: Vec<ItemSnapshot> = directory
        .snapshots()
        .into_iter()
        .filter(|item| item.expires_within(now, horizon))
        .collect();
    items.sort_by_key(|item| item.expiry_date);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDraft;
    use rust_decimal_macros::dec;

    fn seeded_directory() -> InventoryDirectory {
        let directory = InventoryDirectory::new();
        let drafts = [
            ("Bandages", "Consumable", 100, 10, dec!(0.50), None),
            ("Scalpels", "Surgical", 5, 10, dec!(12.00), None),
            ("Saline 0.9%", "Medicine", 0, 20, dec!(3.75), None),
            (
                "Insulin",
                "Medicine",
                30,
                5,
                dec!(25.00),
                Some(Utc::now() + Duration::days(10)),
            ),
            (
                "Old Reagent",
                "Laboratory",
                40,
                5,
                dec!(8.00),
                Some(Utc::now() - Duration::days(2)),
            ),
        ];
        for (name, category, quantity, minimum, price, expiry) in drafts {
            directory
                .create(ItemDraft {
                    name: name.to_string(),
                    category: category.to_string(),
                    initial_quantity: quantity,
                    minimum_stock: minimum,
                    maximum_stock: 1000,
                    unit_price: price,
                    expiry_date: expiry,
                    ..ItemDraft::default()
                })
                .unwrap();
        }
        directory
    }

    #[test]
    fn headline_counts() {
        let directory = seeded_directory();
        let stats = InventoryStats::collect(&directory, Utc::now());

        assert_eq!(stats.total_items, 5);
        assert_eq!(stats.available_items, 2); // Bandages, Insulin
        assert_eq!(stats.low_stock_items, 1); // Scalpels
        assert_eq!(stats.out_of_stock_items, 1); // Saline
        assert_eq!(stats.expiring_items, 1); // Insulin; Old Reagent is already expired
        // 100*0.50 + 5*12.00 + 0 + 30*25.00 + 40*8.00
        assert_eq!(stats.total_value, dec!(1180.00));
    }

    #[test]
    fn expired_items_never_count_as_expiring() {
        let directory = seeded_directory();
        let stats = InventoryStats::collect_with_horizon(&directory, Utc::now(), Duration::days(5));
        assert_eq!(stats.expiring_items, 0); // Insulin is outside a 5-day horizon
    }

    #[test]
    fn category_rollup_is_sorted_and_complete() {
        let directory = seeded_directory();
        let groups = by_category(&directory);

        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, ["Consumable", "Laboratory", "Medicine", "Surgical"]);

        let medicine = groups.iter().find(|g| g.category == "Medicine").unwrap();
        assert_eq!(medicine.total_items, 2);
        assert_eq!(medicine.total_value, dec!(750.00));
        assert_eq!(medicine.out_of_stock_count, 1);

        let surgical = groups.iter().find(|g| g.category == "Surgical").unwrap();
        assert_eq!(surgical.low_stock_count, 1);
    }

    #[test]
    fn expiring_listing_sorted_soonest_first() {
        let directory = seeded_directory();
        directory
            .create(ItemDraft {
                name: "Test Strips".to_string(),
                initial_quantity: 10,
                minimum_stock: 1,
                expiry_date: Some(Utc::now() + Duration::days(3)),
                ..ItemDraft::default()
            })
            .unwrap();

        let items = expiring_items(&directory, Utc::now(), 30);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Test Strips");
        assert_eq!(items[1].name, "Insulin");
    }

    #[test]
    fn stats_serialize_camel_case() {
        let directory = seeded_directory();
        let json = serde_json::to_value(InventoryStats::collect(&directory, Utc::now())).unwrap();
        assert_eq!(json["totalItems"], 5);
        assert_eq!(json["availableItems"], 2);
        assert_eq!(json["lowStockItems"], 1);
        assert_eq!(json["outOfStockItems"], 1);
        assert_eq!(json["expiringItems"], 1);
        assert_eq!(json["totalValue"], "1180.00");
    }
}
