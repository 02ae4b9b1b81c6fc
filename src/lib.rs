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

//! # Stock Ledger
//!
//! This library provides a hospital inventory stock ledger: per-item
//! quantities with an append-only movement history, a derived stock status,
//! and fleet-wide alerting statistics, safe under concurrent updates from
//! multiple staff terminals.
//!
//! ## Core Components
//!
//! - [`InventoryDirectory`]: Collection owning all item ledgers
//! - [`StockLedger`]: One item's quantity, movement log and status
//! - [`classify`]: Pure status derivation (expiry > out > low > in stock)
//! - [`InventoryStats`]: On-demand dashboard statistics
//! - [`InventoryError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use stock_ledger_rs::{InventoryDirectory, ItemDraft, StockStatus};
//!
//! let directory = InventoryDirectory::new();
//!
//! let item = directory.create(ItemDraft {
//!     name: "Surgical Gloves".into(),
//!     category: "Consumable".into(),
//!     initial_quantity: 10,
//!     minimum_stock: 5,
//!     maximum_stock: 100,
//!     ..ItemDraft::default()
//! }).unwrap();
//! assert_eq!(item.status, StockStatus::InStock);
//!
//! // Consume seven units; the movement log, quantity and status move together.
//! let (quantity, status) = directory
//!     .adjust_stock(item.id, -7, "used in surgery", "nurse1")
//!     .unwrap();
//! assert_eq!(quantity, 3);
//! assert_eq!(status, StockStatus::LowStock);
//! ```
//!
//! ## Thread Safety
//!
//! The directory serializes writers per item, never globally: adjustments
//! to different items proceed in parallel, and two concurrent consumptions
//! of the same item are both reflected, never lost.

pub mod base;
pub mod directory;
pub mod error;
pub mod item;
pub mod movement;
pub mod stats;
pub mod status;

pub use base::ItemId;
pub use directory::{InventoryDirectory, ItemFilter};
pub use error::InventoryError;
pub use item::{DescriptiveEdit, ItemDraft, ItemSnapshot, Location, StockLedger};
pub use movement::{MovementKind, StockMovement};
pub use stats::{CategoryStats, DEFAULT_EXPIRY_HORIZON_DAYS, InventoryStats};
pub use status::{StockStatus, classify};
