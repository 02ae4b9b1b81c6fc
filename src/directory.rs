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

//! Inventory directory.
//!
//! The [`InventoryDirectory`] owns every item's [`StockLedger`] and is the
//! only way in: lookup, filtered listing, creation and the stock-adjustment
//! entry point all go through it. Items are held in a [`DashMap`] so
//! operations on different items never contend; within one item the
//! ledger's own mutex serializes writers.
//!
//! Items are never removed. Retirement/archival has no defined policy in
//! the product, so the directory deliberately exposes no delete path.

use crate::base::ItemId;
use crate::error::InventoryError;
use crate::item::{DescriptiveEdit, ItemDraft, ItemSnapshot, StockLedger};
use crate::status::StockStatus;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Listing filter. Unset fields match everything; set fields all have to
/// match (category and status exactly, search as a case-insensitive
/// substring of name or code).
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub status: Option<StockStatus>,
    pub search: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, item: &ItemSnapshot) -> bool {
        if let Some(category) = &self.category {
            if item.category != *category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !item.name.to_lowercase().contains(&needle)
                && !item.code.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// The collection of all item ledgers, keyed by item id.
///
/// # Invariants
///
/// - Item ids are unique and never reused.
/// - Every mutation of one item's quantity/log/status happens under that
///   item's own lock; no operation ever holds two item locks.
/// - Reads return per-item-consistent snapshots; listings are a union of
///   such snapshots, not a global cut.
pub struct InventoryDirectory {
    /// Item ledgers indexed by id.
    items: DashMap<ItemId, StockLedger>,
    /// Source of item ids; ids are allocated once and never reused, so
    /// listing in id order is insertion order.
    next_id: AtomicU32,
}

impl InventoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Registers a new item and returns its first snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the draft validation errors from [`StockLedger::new`]
    /// (blank name, negative price, inverted thresholds).
    pub fn create(&self, draft: ItemDraft) -> Result<ItemSnapshot, InventoryError> {
        let id = ItemId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let ledger = StockLedger::new(id, draft)?;
        let snapshot = ledger.snapshot();
        self.items.insert(id, ledger);
        Ok(snapshot)
    }

    /// Snapshot of a single item.
    ///
    /// # Errors
    ///
    /// [`InventoryError::ItemNotFound`] if the id is unknown.
    pub fn get(&self, id: ItemId) -> Result<ItemSnapshot, InventoryError> {
        self.items
            .get(&id)
            .map(|ledger| ledger.snapshot())
            .ok_or(InventoryError::ItemNotFound(id))
    }

    /// Filtered listing in stable insertion (id) order.
    pub fn list(&self, filter: &ItemFilter) -> Vec<ItemSnapshot> {
        let mut items: Vec<ItemSnapshot> = self
            .items
            .iter()
            .map(|entry| entry.value().snapshot())
            .filter(|snapshot| filter.matches(snapshot))
            .collect();
        items.sort_by_key(|item| item.id);
        items
    }

    /// Unfiltered listing; what the aggregator scans.
    pub fn snapshots(&self) -> Vec<ItemSnapshot> {
        self.list(&ItemFilter::default())
    }

    /// Applies a signed stock adjustment to one item.
    ///
    /// Delegates to the item's [`StockLedger::adjust`]; see there for the
    /// atomicity and rejection contract.
    ///
    /// # Errors
    ///
    /// [`InventoryError::ItemNotFound`] for an unknown id, plus everything
    /// `adjust` can return.
    pub fn adjust_stock(
        &self,
        id: ItemId,
        delta: i64,
        reason: &str,
        actor: &str,
    ) -> Result<(u32, StockStatus), InventoryError> {
        let ledger = self.items.get(&id).ok_or(InventoryError::ItemNotFound(id))?;
        ledger.adjust(delta, reason, actor)
    }

    /// Applies a combined descriptive/threshold edit to one item as a
    /// single atomic unit; a threshold left `None` keeps its current
    /// value. See [`StockLedger::edit`] for the validation contract.
    pub fn edit_item(
        &self,
        id: ItemId,
        edit: DescriptiveEdit,
        minimum_stock: Option<u32>,
        maximum_stock: Option<u32>,
    ) -> Result<ItemSnapshot, InventoryError> {
        let ledger = self.items.get(&id).ok_or(InventoryError::ItemNotFound(id))?;
        ledger.edit(edit, minimum_stock, maximum_stock)
    }

    /// Updates an item's descriptive fields.
    pub fn edit_descriptive(
        &self,
        id: ItemId,
        edit: DescriptiveEdit,
    ) -> Result<ItemSnapshot, InventoryError> {
        let ledger = self.items.get(&id).ok_or(InventoryError::ItemNotFound(id))?;
        ledger.edit_descriptive(edit)
    }

    /// Updates an item's thresholds, re-deriving its status.
    pub fn edit_thresholds(
        &self,
        id: ItemId,
        minimum_stock: u32,
        maximum_stock: u32,
    ) -> Result<ItemSnapshot, InventoryError> {
        let ledger = self.items.get(&id).ok_or(InventoryError::ItemNotFound(id))?;
        ledger.edit_thresholds(minimum_stock, maximum_stock)
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for InventoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}
