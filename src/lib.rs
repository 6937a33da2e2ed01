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

//! # Points Ledger
//!
//! This library keeps the virtual point balances of a livestream chat bot.
//! Every balance change goes through a [`Ledger`] that can undo and redo it.
//!
//! ## Core Components
//!
//! - [`Account`]: Capability of anything holding a point balance
//! - [`Transaction`]: Deposit, withdrawal, transfer or [`Batch`] of those
//! - [`Ledger`]: Executes transactions and keeps undo/redo history
//! - [`AmountParser`]: Turns `10`, `10%`, `all` or `half` into points
//! - [`PointsBot`]: Chat commands (rewards, gamble, give) on top of a [`UserStore`]
//!
//! ## Example
//!
//! ```
//! use points_ledger::{Account, AmountParser, Batch, BotUser, Ledger, Transaction, UserId};
//! use std::sync::Arc;
//!
//! let alice = Arc::new(BotUser::with_balance(UserId(1), 100));
//! let bob = Arc::new(BotUser::new(UserId(2)));
//! let mut ledger: Ledger<BotUser> = Ledger::new();
//!
//! let amount = AmountParser::convert("half", Some(alice.as_ref())).unwrap();
//! ledger
//!     .execute(Batch::from(vec![
//!         Transaction::withdrawal(Arc::clone(&alice), amount),
//!         Transaction::deposit(Arc::clone(&bob), amount),
//!     ]))
//!     .unwrap();
//! assert_eq!(bob.balance(), 50);
//!
//! ledger.undo().unwrap();
//! assert_eq!(alice.balance(), 100);
//! assert_eq!(bob.balance(), 0);
//! ```
//!
//! ## Thread Safety
//!
//! Accounts lock internally and may be shared across threads. The ledger is
//! single-actor: it takes `&mut self` and must be serialized by the caller.

pub mod account;
mod amount;
mod base;
mod batch;
pub mod bot;
mod chatter;
pub mod config;
pub mod error;
mod ledger;
pub mod logging;
pub mod store;
mod transaction;

pub use account::{Account, BotUser};
pub use amount::AmountParser;
pub use base::{Points, UserId};
pub use batch::Batch;
pub use bot::{BalanceTier, GambleOutcome, PointsBot};
pub use chatter::{Chatter, is_bot_admin, is_bot_admin_or_mod};
pub use config::BotConfig;
pub use error::{AmountError, BotError, StoreError, TransactionError};
pub use ledger::Ledger;
pub use store::{InMemoryUserStore, UserStore};
pub use transaction::Transaction;
