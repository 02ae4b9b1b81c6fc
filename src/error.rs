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

//! Error types for stock ledger operations.

use crate::base::ItemId;
use thiserror::Error;

/// Inventory operation errors.
///
/// Three families: caller-contract violations (missing fields, inverted
/// thresholds, zero delta), missing items, and the one business-rule
/// rejection: a consumption that would drive the quantity negative.
/// Failures never leave partial state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Item name is empty at creation or edit
    #[error("item name is required")]
    MissingName,

    /// Stock adjustment submitted without a justification
    #[error("a reason is required for stock adjustments")]
    MissingReason,

    /// Stock adjustment submitted without an operator identity
    #[error("an operator is required for stock adjustments")]
    MissingActor,

    /// Adjustment delta of zero carries no movement kind
    #[error("adjustment delta must be non-zero")]
    ZeroAdjustment,

    /// Unit price below zero
    #[error("unit price must not be negative")]
    NegativePrice,

    /// `minimumStock > maximumStock` at creation or threshold edit
    #[error("minimum stock {minimum} exceeds maximum stock {maximum}")]
    ThresholdsInverted { minimum: u32, maximum: u32 },

    /// A consumption would drive the on-hand quantity negative.
    /// Carries the attempted amount and the current quantity so the
    /// caller can render "cannot remove more than on hand".
    #[error("insufficient stock: tried to remove {requested} with {available} on hand")]
    InsufficientStock { requested: u32, available: u32 },

    /// A receipt would overflow the stock counter
    #[error("adjustment would overflow the stock counter")]
    QuantityOverflow,

    /// Referenced item id does not exist
    #[error("inventory item {0} not found")]
    ItemNotFound(ItemId),
}

impl InventoryError {
    /// True for the caller-fixable argument errors (the 400 family).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::MissingName
                | Self::MissingReason
                | Self::MissingActor
                | Self::ZeroAdjustment
                | Self::NegativePrice
                | Self::ThresholdsInverted { .. }
                | Self::QuantityOverflow
        )
    }
}
