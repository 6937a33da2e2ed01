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

//! User storage contract.
//!
//! The ledger never loads or saves accounts itself. Callers load users from a
//! [`UserStore`] before building transactions and save them afterwards.

use crate::BotUser;
use crate::account::Account;
use crate::base::UserId;
use crate::error::StoreError;
use dashmap::DashMap;
use std::sync::Arc;

/// Load/save-by-id access to bot users.
pub trait UserStore {
    /// Loads a stored user.
    fn get(&self, id: UserId) -> Result<Option<Arc<BotUser>>, StoreError>;

    /// Loads a stored user, or returns a fresh zero-balance user that is not
    /// stored until [`UserStore::save`] is called.
    fn get_or_create(&self, id: UserId) -> Result<Arc<BotUser>, StoreError> {
        Ok(self
            .get(id)?
            .unwrap_or_else(|| Arc::new(BotUser::new(id))))
    }

    /// Persists the given users, inserting those not stored yet.
    fn save(&self, users: &[&Arc<BotUser>]) -> Result<(), StoreError>;

    /// Users with the highest balances, richest first.
    fn top_by_balance(&self, limit: usize) -> Result<Vec<Arc<BotUser>>, StoreError>;

    /// Every stored user, ordered by id.
    fn users(&self) -> Result<Vec<Arc<BotUser>>, StoreError>;
}

/// Process-local store backed by a [`DashMap`].
///
/// Saved users are shared by reference, so balance changes are visible to
/// later loads even before the next save.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<UserId, Arc<BotUser>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn get(&self, id: UserId) -> Result<Option<Arc<BotUser>>, StoreError> {
        Ok(self.users.get(&id).map(|entry| Arc::clone(entry.value())))
    }

    fn save(&self, users: &[&Arc<BotUser>]) -> Result<(), StoreError> {
        for user in users {
            self.users
                .entry(user.id())
                .or_insert_with(|| Arc::clone(user));
        }
        Ok(())
    }

    fn top_by_balance(&self, limit: usize) -> Result<Vec<Arc<BotUser>>, StoreError> {
        let mut users = self.users()?;
        // Stable sort keeps ties ordered by id.
        users.sort_by_key(|user| std::cmp::Reverse(user.balance()));
        users.truncate(limit);
        Ok(users)
    }

    fn users(&self) -> Result<Vec<Arc<BotUser>>, StoreError> {
        let mut users: Vec<Arc<BotUser>> = self
            .users
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        users.sort_by_key(|user| user.id());
        Ok(users)
    }
}
