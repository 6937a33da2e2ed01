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

//! Transaction history with undo and redo.
//!
//! The [`Ledger`] is the single gate through which balance changes pass. It
//! keeps two stacks:
//!
//! ```text
//!             execute ──► undo stack ──undo──► redo stack
//!                             ▲                    │
//!                             └───────redo─────────┘
//! ```
//!
//! Executing a new transaction clears the redo stack, so history is linear:
//! an undone branch is discarded as soon as something else is executed.
//!
//! # Thread Safety
//!
//! The ledger does no locking of its own; every operation takes `&mut self`.
//! Callers sharing one between tasks must serialize access, e.g. behind a
//! single mutex per ledger.

use crate::account::Account;
use crate::base::Points;
use crate::error::TransactionError;
use crate::transaction::Transaction;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub struct Ledger<A: Account + ?Sized> {
    /// Applied transactions, most recent last.
    undo_stack: Vec<Transaction<A>>,
    /// Undone transactions, most recently undone last.
    redo_stack: Vec<Transaction<A>>,
}

impl<A: Account + ?Sized> Ledger<A> {
    /// Creates a ledger with empty history.
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Executes a transaction or batch and records it for undo.
    ///
    /// # Errors
    ///
    /// Propagates the transaction's failure. History is left untouched, and
    /// a failing batch has already rolled itself back.
    pub fn execute(
        &mut self,
        transaction: impl Into<Transaction<A>>,
    ) -> Result<(), TransactionError> {
        let transaction = transaction.into();
        transaction.execute()?;

        if !self.redo_stack.is_empty() {
            debug!("Discarding {} undone transactions", self.redo_stack.len());
            self.redo_stack.clear();
        }
        self.undo_stack.push(transaction);
        Ok(())
    }

    /// Undoes the most recent transaction.
    ///
    /// Returns the undone transaction, or `None` if there was nothing to undo.
    ///
    /// # Errors
    ///
    /// If the inverse cannot be applied the transaction stays on the undo
    /// stack and the error is returned.
    pub fn undo(&mut self) -> Result<Option<&Transaction<A>>, TransactionError> {
        let Some(transaction) = self.undo_stack.pop() else {
            debug!("Nothing to undo");
            return Ok(None);
        };

        if let Err(e) = transaction.undo() {
            self.undo_stack.push(transaction);
            return Err(e);
        }

        self.redo_stack.push(transaction);
        Ok(self.redo_stack.last())
    }

    /// Re-executes the most recently undone transaction.
    ///
    /// Returns the redone transaction, or `None` if there was nothing to redo.
    ///
    /// # Errors
    ///
    /// If the transaction cannot be re-applied (balances changed since the
    /// undo) it stays on the redo stack and the error is returned.
    pub fn redo(&mut self) -> Result<Option<&Transaction<A>>, TransactionError> {
        let Some(transaction) = self.redo_stack.pop() else {
            debug!("Nothing to redo");
            return Ok(None);
        };

        if let Err(e) = transaction.execute() {
            self.redo_stack.push(transaction);
            return Err(e);
        }

        self.undo_stack.push(transaction);
        Ok(self.undo_stack.last())
    }

    /// Deposits `amount` into a rewardable account.
    ///
    /// Non-positive amounts and accounts that opted out of rewards are
    /// skipped. Returns whether the reward was paid.
    pub fn reward(&mut self, account: Arc<A>, amount: Points) -> Result<bool, TransactionError> {
        if amount <= 0 || !account.is_rewardable() {
            debug!("Skipping reward of {amount} points to user {}", account.identity());
            return Ok(false);
        }

        self.execute(Transaction::deposit(account, amount))?;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of transactions that can be undone.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of transactions that can be redone.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

impl<A: Account + ?Sized> Default for Ledger<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Account + ?Sized> fmt::Debug for Ledger<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("undo_stack", &self.undo_stack)
            .field("redo_stack", &self.redo_stack)
            .finish()
    }
}
