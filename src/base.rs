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

//! Core identifier types for inventory items.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a stock-keeping unit.
///
/// Wraps a `u32`, assigned sequentially by the directory at item creation
/// and immutable afterwards. The human-facing display code (`INV000042`)
/// is derived from it when the caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Default display code for an item created without an explicit code.
    pub fn default_code(&self) -> String {
        format!("INV{:06}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemId;

    #[test]
    fn default_code_is_zero_padded() {
        assert_eq!(ItemId(1).default_code(), "INV000001");
        assert_eq!(ItemId(123456).default_code(), "INV123456");
    }
}
