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

//! Point commands offered to chat.
//!
//! [`PointsBot`] ties the ledger to a [`UserStore`]: every command loads the
//! users it needs, runs one transaction through the ledger and saves the users
//! it touched. Replies are left to the chat layer; errors carry a
//! `chat_message()` for that purpose.
//!
//! | Command | Effect |
//! |---------|--------|
//! | chat message | `chat_reward` points to the author |
//! | gamble | win or lose the amount on a coin flip |
//! | give | move the amount from the author to a target |
//! | undo / redo | step through ledger history (mods and admins) |

use crate::account::{Account, BotUser};
use crate::amount::AmountParser;
use crate::base::{Points, UserId};
use crate::batch::Batch;
use crate::chatter::{Chatter, is_bot_admin_or_mod};
use crate::config::BotConfig;
use crate::error::{BotError, TransactionError};
use crate::ledger::Ledger;
use crate::store::UserStore;
use crate::transaction::Transaction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{error, info};

/// Result of a gamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GambleOutcome {
    pub won: bool,
    pub amount: Points,
    /// Balance after the gamble.
    pub balance: Points,
}

/// Coarse wealth bracket used to pick a reaction when showing a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTier {
    /// Up to 500 points.
    Low,
    /// Up to 1000 points.
    Mid,
    High,
}

impl BalanceTier {
    pub fn from_balance(balance: Points) -> Self {
        match balance {
            Points::MIN..=500 => Self::Low,
            501..=1000 => Self::Mid,
            _ => Self::High,
        }
    }
}

pub struct PointsBot<S: UserStore> {
    ledger: Ledger<BotUser>,
    store: S,
    config: BotConfig,
    rng: StdRng,
}

impl<S: UserStore> PointsBot<S> {
    pub fn new(store: S, config: BotConfig) -> Self {
        Self::with_rng(store, config, StdRng::from_os_rng())
    }

    /// Creates a bot whose gambles are reproducible.
    pub fn with_seed(store: S, config: BotConfig, seed: u64) -> Self {
        Self::with_rng(store, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: S, config: BotConfig, rng: StdRng) -> Self {
        Self {
            ledger: Ledger::new(),
            store,
            config,
            rng,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger<BotUser> {
        &self.ledger
    }

    /// Rewards the author of an ordinary chat message.
    ///
    /// Messages without a known author, commands and ignored users earn
    /// nothing. Reward failures are logged, never surfaced to chat. Returns
    /// whether a reward was paid.
    pub fn on_message(&mut self, author: Option<&Chatter>, content: &str) -> bool {
        let Some(author) = author else {
            return false;
        };
        if content.starts_with(&self.config.command_prefix) {
            return false;
        }

        match self.reward_chatter(author) {
            Ok(paid) => paid,
            Err(e) => {
                error!("Failed to reward user {}: {e}", author.id);
                false
            }
        }
    }

    fn reward_chatter(&mut self, author: &Chatter) -> Result<bool, BotError> {
        let user = self.store.get_or_create(author.id)?;
        if self.config.is_ignored(author.id) {
            user.set_rewardable(false);
        }

        let amount = Points::from(self.config.chat_reward);
        let paid = self.ledger.reward(Arc::clone(&user), amount)?;
        if paid {
            self.store.save(&[&user])?;
        }
        Ok(paid)
    }

    /// Bets `raw_amount` on a fair coin flip.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::InsufficientFunds`] - unknown author or a lost
    ///   bet larger than the balance.
    /// - [`BotError::Amount`] - `raw_amount` is not a valid amount.
    pub fn gamble(
        &mut self,
        author: &Chatter,
        raw_amount: &str,
    ) -> Result<GambleOutcome, BotError> {
        // Users never seen before have no points to bet.
        let user = self
            .store
            .get(author.id)?
            .ok_or(TransactionError::InsufficientFunds)?;
        let amount = AmountParser::convert(raw_amount, Some(user.as_ref()))?;

        let won = self.rng.random_bool(0.5);
        let transaction = if won {
            Transaction::deposit(Arc::clone(&user), amount)
        } else {
            Transaction::withdrawal(Arc::clone(&user), amount)
        };
        self.ledger.execute(transaction)?;
        self.store.save(&[&user])?;

        let outcome = GambleOutcome {
            won,
            amount,
            balance: user.balance(),
        };
        info!("User {} gambled {amount} points: {outcome:?}", author.id);
        Ok(outcome)
    }

    /// Gives `raw_amount` of the author's points to `target`.
    ///
    /// The target is created if it has never been seen. Returns the amount
    /// given.
    pub fn give(
        &mut self,
        author: &Chatter,
        target: UserId,
        raw_amount: &str,
    ) -> Result<Points, BotError> {
        let giver = self
            .store
            .get(author.id)?
            .ok_or(TransactionError::InsufficientFunds)?;
        let amount = AmountParser::convert(raw_amount, Some(giver.as_ref()))?;
        let receiver = self.store.get_or_create(target)?;

        self.ledger.execute(Batch::from(vec![
            Transaction::withdrawal(Arc::clone(&giver), amount),
            Transaction::deposit(Arc::clone(&receiver), amount),
        ]))?;
        self.store.save(&[&giver, &receiver])?;

        info!("User {} gave {amount} points to user {target}", author.id);
        Ok(amount)
    }

    /// Balance of `target`; users never seen have zero points.
    pub fn coins(&self, target: UserId) -> Result<(Points, BalanceTier), BotError> {
        let balance = self
            .store
            .get(target)?
            .map_or(0, |user| user.balance());
        Ok((balance, BalanceTier::from_balance(balance)))
    }

    /// The richest users, up to `leaderboard_size` of them.
    pub fn leaderboard(&self) -> Result<Vec<(UserId, Points)>, BotError> {
        Ok(self
            .store
            .top_by_balance(self.config.leaderboard_size)?
            .iter()
            .map(|user| (user.id(), user.balance()))
            .collect())
    }

    /// Undoes the most recent ledger transaction.
    ///
    /// Returns a description of what was undone, or `None` if history is
    /// empty.
    pub fn undo(&mut self, author: &Chatter) -> Result<Option<String>, BotError> {
        if !is_bot_admin_or_mod(author, &self.config) {
            return Err(BotError::NotPermitted);
        }
        let Some(transaction) = self.ledger.undo()? else {
            return Ok(None);
        };

        self.store.save(&transaction.accounts())?;
        info!("User {} undid {transaction}", author.id);
        Ok(Some(transaction.to_string()))
    }

    /// Redoes the most recently undone ledger transaction.
    pub fn redo(&mut self, author: &Chatter) -> Result<Option<String>, BotError> {
        if !is_bot_admin_or_mod(author, &self.config) {
            return Err(BotError::NotPermitted);
        }
        let Some(transaction) = self.ledger.redo()? else {
            return Ok(None);
        };

        self.store.save(&transaction.accounts())?;
        info!("User {} redid {transaction}", author.id);
        Ok(Some(transaction.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_tiers() {
        assert_eq!(BalanceTier::from_balance(0), BalanceTier::Low);
        assert_eq!(BalanceTier::from_balance(500), BalanceTier::Low);
        assert_eq!(BalanceTier::from_balance(501), BalanceTier::Mid);
        assert_eq!(BalanceTier::from_balance(1000), BalanceTier::Mid);
        assert_eq!(BalanceTier::from_balance(1001), BalanceTier::High);
    }
}
