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

//! Account capability and the bot's user account.
//!
//! Transactions only ever see an [`Account`]; [`BotUser`] is the concrete
//! account persisted by the user store.
//!
//! # Example
//!
//! ```
//! use points_ledger::{Account, BotUser, UserId};
//!
//! let user = BotUser::new(UserId(1));
//! user.deposit(100).unwrap();
//! assert_eq!(user.balance(), 100);
//! ```

use crate::TransactionError;
use crate::base::{Points, UserId};
use parking_lot::Mutex;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Anything holding a point balance.
///
/// Methods take `&self`: implementors guard their balance with interior
/// mutability so that the same account can be referenced by several
/// transactions in the ledger history.
pub trait Account {
    /// Adds `amount` to the balance.
    fn deposit(&self, amount: Points) -> Result<(), TransactionError>;

    /// Removes `amount` from the balance.
    ///
    /// # Errors
    ///
    /// [`TransactionError::InsufficientFunds`] if `amount` exceeds the balance.
    fn withdraw(&self, amount: Points) -> Result<(), TransactionError>;

    fn balance(&self) -> Points;

    /// Stable, human-readable identifier used in log lines.
    fn identity(&self) -> String;

    /// Whether passive rewards (chat activity) may be paid to this account.
    fn is_rewardable(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct BotUserData {
    id: UserId,
    balance: Points,
    rewardable: bool,
}

impl BotUserData {
    fn new(id: UserId, balance: Points) -> Self {
        Self {
            id,
            balance,
            rewardable: true,
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= 0,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    fn deposit(&mut self, amount: Points) -> Result<(), TransactionError> {
        if amount < 0 {
            return Err(TransactionError::InvalidAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(TransactionError::Overflow)?;
        self.assert_invariants();
        Ok(())
    }

    fn withdraw(&mut self, amount: Points) -> Result<(), TransactionError> {
        if amount < 0 {
            return Err(TransactionError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(TransactionError::InsufficientFunds);
        }
        self.balance -= amount;
        self.assert_invariants();
        Ok(())
    }
}

/// A viewer known to the bot.
#[derive(Debug)]
pub struct BotUser {
    inner: Mutex<BotUserData>,
}

impl BotUser {
    /// Creates a user with a zero balance.
    pub fn new(id: UserId) -> Self {
        Self::with_balance(id, 0)
    }

    /// Rebuilds a user loaded from storage.
    pub fn with_balance(id: UserId, balance: Points) -> Self {
        Self {
            inner: Mutex::new(BotUserData::new(id, balance.max(0))),
        }
    }

    pub fn id(&self) -> UserId {
        self.inner.lock().id
    }

    pub fn set_rewardable(&self, rewardable: bool) {
        self.inner.lock().rewardable = rewardable;
    }
}

impl Account for BotUser {
    fn deposit(&self, amount: Points) -> Result<(), TransactionError> {
        self.inner.lock().deposit(amount)
    }

    fn withdraw(&self, amount: Points) -> Result<(), TransactionError> {
        self.inner.lock().withdraw(amount)
    }

    fn balance(&self) -> Points {
        self.inner.lock().balance
    }

    fn identity(&self) -> String {
        self.inner.lock().id.to_string()
    }

    fn is_rewardable(&self) -> bool {
        self.inner.lock().rewardable
    }
}

impl Serialize for BotUser {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("BotUser", 2)?;
        state.serialize_field("user", &data.id)?;
        state.serialize_field("balance", &data.balance)?;
        state.end()
    }
}
