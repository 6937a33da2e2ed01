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

//! Core identifier and amount types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed point amount.
///
/// Wide enough that any 20-digit numeric amount typed in chat parses without
/// overflow; balances themselves never go negative.
pub type Points = i128;

/// Unique identifier for a chat user, as assigned by the streaming platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_displays_inner_value() {
        assert_eq!(UserId(42).to_string(), "42");
    }

    #[test]
    fn points_hold_twenty_digit_amounts() {
        let max: Points = "99999999999999999999".parse().unwrap();
        assert!(max > 0);
    }
}
