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

//! Per-item stock ledger.
//!
//! A [`StockLedger`] owns one item's quantity, thresholds, descriptive
//! fields and append-only movement log behind a single mutex. Quantity,
//! log and status only ever change together inside that critical section,
//! so no reader can observe an updated quantity with a stale log or a
//! stale status.
//!
//! # Example
//!
//! ```
//! use stock_ledger_rs::{ItemDraft, ItemId, StockLedger, StockStatus};
//!
//! let draft = ItemDraft {
//!     name: "Surgical Gloves".into(),
//!     initial_quantity: 10,
//!     minimum_stock: 5,
//!     maximum_stock: 100,
//!     ..ItemDraft::default()
//! };
//! let ledger = StockLedger::new(ItemId(1), draft).unwrap();
//!
//! let (quantity, status) = ledger.adjust(-7, "used in surgery", "nurse1").unwrap();
//! assert_eq!(quantity, 3);
//! assert_eq!(status, StockStatus::LowStock);
//! ```

use crate::base::ItemId;
use crate::error::InventoryError;
use crate::movement::{MovementKind, StockMovement};
use crate::status::{StockStatus, classify};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Storage location of an item within the facility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub building: String,
    pub floor: String,
    pub room: String,
    pub shelf: String,
}

/// Everything needed to create an item.
///
/// Fields not supplied fall back to the traditional defaults (threshold
/// 10/1000, unit "pieces"); `name` has no default and must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemDraft {
    /// Display code; auto-generated from the item id when `None`.
    pub code: Option<String>,
    pub name: String,
    pub category: String,
    pub description: String,
    pub initial_quantity: u32,
    pub minimum_stock: u32,
    pub maximum_stock: u32,
    pub unit_price: Decimal,
    pub unit: String,
    pub supplier: String,
    pub location: Location,
    pub expiry_date: Option<DateTime<Utc>>,
    pub batch_number: Option<String>,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            code: None,
            name: String::new(),
            category: "Other".to_string(),
            description: String::new(),
            initial_quantity: 0,
            minimum_stock: 10,
            maximum_stock: 1000,
            unit_price: Decimal::ZERO,
            unit: "pieces".to_string(),
            supplier: String::new(),
            location: Location::default(),
            expiry_date: None,
            batch_number: None,
        }
    }
}

impl ItemDraft {
    fn validate(&self) -> Result<(), InventoryError> {
        if self.name.trim().is_empty() {
            return Err(InventoryError::MissingName);
        }
        if self.unit_price < Decimal::ZERO {
            return Err(InventoryError::NegativePrice);
        }
        if self.minimum_stock > self.maximum_stock {
            return Err(InventoryError::ThresholdsInverted {
                minimum: self.minimum_stock,
                maximum: self.maximum_stock,
            });
        }
        Ok(())
    }
}

/// Partial update of an item's descriptive fields.
///
/// `None` leaves a field untouched. Expiry and batch number use a double
/// `Option` so a caller can distinguish "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct DescriptiveEdit {
    pub code: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<Location>,
    pub unit_price: Option<Decimal>,
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    pub batch_number: Option<Option<String>>,
}

#[derive(Debug)]
struct ItemState {
    id: ItemId,
    code: String,
    name: String,
    category: String,
    description: String,
    initial_quantity: u32,
    quantity: u32,
    minimum_stock: u32,
    maximum_stock: u32,
    unit_price: Decimal,
    unit: String,
    supplier: String,
    location: Location,
    expiry_date: Option<DateTime<Utc>>,
    batch_number: Option<String>,
    status: StockStatus,
    /// Append-only, creation order. Never reordered or truncated.
    movements: Vec<StockMovement>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_restocked: Option<DateTime<Utc>>,
    last_used: Option<DateTime<Utc>>,
}

impl ItemState {
    fn assert_invariants(&self) {
        let folded: i64 = i64::from(self.initial_quantity)
            + self.movements.iter().map(StockMovement::signed_delta).sum::<i64>();
        debug_assert_eq!(
            folded,
            i64::from(self.quantity),
            "Invariant violated: quantity diverged from movement log fold"
        );
    }

    fn reclassify(&mut self, now: DateTime<Utc>) {
        self.status = classify(self.quantity, self.minimum_stock, self.expiry_date, now);
    }

    /// Commit timestamp for the next movement, clamped so the log stays
    /// monotonically non-decreasing even if the wall clock steps back.
    fn commit_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.movements.last().map_or(now, |last| last.timestamp.max(now))
    }

    fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            minimum_stock: self.minimum_stock,
            maximum_stock: self.maximum_stock,
            unit_price: self.unit_price,
            unit: self.unit.clone(),
            supplier: self.supplier.clone(),
            location: self.location.clone(),
            expiry_date: self.expiry_date,
            batch_number: self.batch_number.clone(),
            status: self.status,
            movements: self.movements.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_restocked: self.last_restocked,
            last_used: self.last_used,
        }
    }
}

/// One item's authoritative ledger: current quantity plus the append-only
/// movement log, with status derived inside the same atomic unit.
#[derive(Debug)]
pub struct StockLedger {
    inner: Mutex<ItemState>,
}

impl StockLedger {
    /// Creates a ledger from a validated draft. The initial quantity is
    /// recorded as the fold base, not as a movement.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::MissingName`] - draft name is empty.
    /// - [`InventoryError::NegativePrice`] - unit price below zero.
    /// - [`InventoryError::ThresholdsInverted`] - minimum above maximum.
    pub fn new(id: ItemId, draft: ItemDraft) -> Result<Self, InventoryError> {
        draft.validate()?;
        let now = Utc::now();
        let status = classify(
            draft.initial_quantity,
            draft.minimum_stock,
            draft.expiry_date,
            now,
        );
        Ok(Self {
            inner: Mutex::new(ItemState {
                id,
                code: draft.code.unwrap_or_else(|| id.default_code()),
                name: draft.name,
                category: draft.category,
                description: draft.description,
                initial_quantity: draft.initial_quantity,
                quantity: draft.initial_quantity,
                minimum_stock: draft.minimum_stock,
                maximum_stock: draft.maximum_stock,
                unit_price: draft.unit_price,
                unit: draft.unit,
                supplier: draft.supplier,
                location: draft.location,
                expiry_date: draft.expiry_date,
                batch_number: draft.batch_number,
                status,
                movements: Vec::new(),
                created_at: now,
                updated_at: now,
                last_restocked: None,
                last_used: None,
            }),
        })
    }

    pub fn id(&self) -> ItemId {
        self.inner.lock().id
    }

    pub fn quantity(&self) -> u32 {
        self.inner.lock().quantity
    }

    pub fn status(&self) -> StockStatus {
        self.inner.lock().status
    }

    /// Applies a signed stock adjustment atomically: appends a movement,
    /// updates the quantity and recomputes the status as one unit.
    ///
    /// Returns the post-adjustment quantity and status. On any error the
    /// item is left exactly as it was; a rejected call appends nothing.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::MissingReason`] / [`InventoryError::MissingActor`] -
    ///   blank justification or operator.
    /// - [`InventoryError::ZeroAdjustment`] - delta of zero.
    /// - [`InventoryError::InsufficientStock`] - consumption exceeds the
    ///   on-hand quantity. Never clamped to zero.
    /// - [`InventoryError::QuantityOverflow`] - receipt overflows the counter.
    pub fn adjust(
        &self,
        delta: i64,
        reason: &str,
        actor: &str,
    ) -> Result<(u32, StockStatus), InventoryError> {
        if reason.trim().is_empty() {
            return Err(InventoryError::MissingReason);
        }
        if actor.trim().is_empty() {
            return Err(InventoryError::MissingActor);
        }
        if delta == 0 {
            return Err(InventoryError::ZeroAdjustment);
        }

        let mut state = self.inner.lock();

        let magnitude = delta.unsigned_abs();
        let new_quantity = if delta > 0 {
            u32::try_from(magnitude)
                .ok()
                .and_then(|add| state.quantity.checked_add(add))
                .ok_or(InventoryError::QuantityOverflow)?
        } else {
            if magnitude > u64::from(state.quantity) {
                return Err(InventoryError::InsufficientStock {
                    // Saturating: anything past u32::MAX is over-ask anyway.
                    requested: u32::try_from(magnitude).unwrap_or(u32::MAX),
                    available: state.quantity,
                });
            }
            state.quantity - magnitude as u32
        };

        let now = Utc::now();
        let timestamp = state.commit_timestamp(now);
        let kind = MovementKind::from_delta(delta);
        state.movements.push(StockMovement {
            kind,
            quantity_delta: magnitude as u32,
            reason: reason.to_string(),
            actor: actor.to_string(),
            timestamp,
        });
        state.quantity = new_quantity;
        match kind {
            MovementKind::Receipt => state.last_restocked = Some(timestamp),
            MovementKind::Consumption => state.last_used = Some(timestamp),
        }
        state.reclassify(now);
        state.updated_at = timestamp;
        state.assert_invariants();

        Ok((state.quantity, state.status))
    }

    /// Point-in-time copy of the item: quantity, status and full movement
    /// history, consistent with each other. Linearizes before or after any
    /// in-flight adjustment, never in between.
    pub fn snapshot(&self) -> ItemSnapshot {
        self.inner.lock().snapshot()
    }

    /// Applies a partial edit of descriptive fields and, optionally, one
    /// or both stock thresholds as a single atomic unit. A threshold left
    /// `None` keeps its current value; the merged pair is validated under
    /// the item lock before any field changes, so a rejected edit leaves
    /// the item exactly as it was.
    ///
    /// Editing the expiry date or a threshold re-derives the status;
    /// other fields never affect it.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::MissingName`] - name edited to blank.
    /// - [`InventoryError::NegativePrice`] - price edited below zero.
    /// - [`InventoryError::ThresholdsInverted`] - merged minimum above
    ///   merged maximum.
    pub fn edit(
        &self,
        edit: DescriptiveEdit,
        minimum_stock: Option<u32>,
        maximum_stock: Option<u32>,
    ) -> Result<ItemSnapshot, InventoryError> {
        if edit.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(InventoryError::MissingName);
        }
        if edit.unit_price.is_some_and(|price| price < Decimal::ZERO) {
            return Err(InventoryError::NegativePrice);
        }

        let mut state = self.inner.lock();

        // All validation happens before the first field is touched.
        let merged_minimum = minimum_stock.unwrap_or(state.minimum_stock);
        let merged_maximum = maximum_stock.unwrap_or(state.maximum_stock);
        if merged_minimum > merged_maximum {
            return Err(InventoryError::ThresholdsInverted {
                minimum: merged_minimum,
                maximum: merged_maximum,
            });
        }

        if let Some(code) = edit.code {
            state.code = code;
        }
        if let Some(name) = edit.name {
            state.name = name;
        }
        if let Some(category) = edit.category {
            state.category = category;
        }
        if let Some(description) = edit.description {
            state.description = description;
        }
        if let Some(unit) = edit.unit {
            state.unit = unit;
        }
        if let Some(supplier) = edit.supplier {
            state.supplier = supplier;
        }
        if let Some(location) = edit.location {
            state.location = location;
        }
        if let Some(price) = edit.unit_price {
            state.unit_price = price;
        }
        if let Some(batch_number) = edit.batch_number {
            state.batch_number = batch_number;
        }
        let expiry_edited = edit.expiry_date.is_some();
        if let Some(expiry) = edit.expiry_date {
            state.expiry_date = expiry;
        }
        let thresholds_edited = minimum_stock.is_some() || maximum_stock.is_some();
        state.minimum_stock = merged_minimum;
        state.maximum_stock = merged_maximum;

        let now = Utc::now();
        if expiry_edited || thresholds_edited {
            // Expiry moving across `now` or a raised minimum can flip the
            // status without any movement.
            state.reclassify(now);
        }
        state.updated_at = now;
        Ok(state.snapshot())
    }

    /// Updates descriptive fields only, leaving the thresholds alone.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::MissingName`] - name edited to blank.
    /// - [`InventoryError::NegativePrice`] - price edited below zero.
    pub fn edit_descriptive(&self, edit: DescriptiveEdit) -> Result<ItemSnapshot, InventoryError> {
        self.edit(edit, None, None)
    }

    /// Replaces both thresholds and re-derives the status against the
    /// current quantity.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::ThresholdsInverted`] - minimum above maximum.
    pub fn edit_thresholds(
        &self,
        minimum_stock: u32,
        maximum_stock: u32,
    ) -> Result<ItemSnapshot, InventoryError> {
        self.edit(
            DescriptiveEdit::default(),
            Some(minimum_stock),
            Some(maximum_stock),
        )
    }
}

/// Immutable view of an item as of one instant, including the full
/// movement history in append order. This is the JSON `ItemView`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub quantity: u32,
    pub minimum_stock: u32,
    pub maximum_stock: u32,
    pub unit_price: Decimal,
    pub unit: String,
    pub supplier: String,
    pub location: Location,
    pub expiry_date: Option<DateTime<Utc>>,
    pub batch_number: Option<String>,
    pub status: StockStatus,
    pub movements: Vec<StockMovement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_restocked: Option<DateTime<Utc>>,
    pub last_used: Option<DateTime<Utc>>,
}

impl ItemSnapshot {
    /// On-hand value of this item: quantity x unit price.
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// Whole days until expiry (negative when already past). `None` for
    /// items without an expiry date.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expiry_date.map(|expiry| (expiry - now).num_days())
    }

    /// Fill level against the maximum threshold, capped at 100.
    pub fn stock_percentage(&self) -> f64 {
        if self.maximum_stock == 0 {
            return 0.0;
        }
        (f64::from(self.quantity) / f64::from(self.maximum_stock) * 100.0).min(100.0)
    }

    /// True when the expiry falls within `(now, now + horizon]`: close
    /// enough to warn about but not yet expired.
    pub fn expires_within(&self, now: DateTime<Utc>, horizon: chrono::Duration) -> bool {
        self.expiry_date
            .is_some_and(|expiry| expiry > now && expiry <= now + horizon)
    }
}
