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

//! All-or-nothing transaction batches.

use crate::account::Account;
use crate::error::TransactionError;
use crate::transaction::Transaction;
use std::slice;
use tracing::{error, warn};

/// An ordered group of transactions applied as one unit.
///
/// # Invariants
///
/// - After [`Batch::execute`] either every member is applied or none is.
/// - Rollback undoes the applied members in reverse order of application.
pub struct Batch<A: Account + ?Sized> {
    transactions: Vec<Transaction<A>>,
}

impl<A: Account + ?Sized> Batch<A> {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
        }
    }

    pub fn push(&mut self, transaction: Transaction<A>) {
        self.transactions.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Transaction<A>> {
        self.transactions.iter()
    }

    /// Applies every member in order.
    ///
    /// # Errors
    ///
    /// Returns the first member failure after undoing, in reverse order, the
    /// members that had already been applied.
    pub fn execute(&self) -> Result<(), TransactionError> {
        for (applied, transaction) in self.transactions.iter().enumerate() {
            if let Err(e) = transaction.execute() {
                warn!("Rolling back batch after failure on {transaction}: {e}");
                for completed in self.transactions[..applied].iter().rev() {
                    if let Err(rollback) = completed.undo() {
                        error!("Failed to roll back {completed}: {rollback}");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Undoes every member in reverse order.
    ///
    /// Assumes the whole batch is applied. If a member cannot be undone, the
    /// members undone so far are redone so the batch stays fully applied.
    pub fn undo(&self) -> Result<(), TransactionError> {
        for (position, transaction) in self.transactions.iter().enumerate().rev() {
            if let Err(e) = transaction.undo() {
                warn!("Restoring batch after failed undo of {transaction}: {e}");
                for undone in &self.transactions[position + 1..] {
                    if let Err(restore) = undone.redo() {
                        error!("Failed to restore {undone}: {restore}");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Redoes every member in original order.
    pub fn redo(&self) -> Result<(), TransactionError> {
        for transaction in &self.transactions {
            transaction.redo()?;
        }
        Ok(())
    }
}

impl<A: Account + ?Sized> Default for Batch<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Account + ?Sized> From<Vec<Transaction<A>>> for Batch<A> {
    fn from(transactions: Vec<Transaction<A>>) -> Self {
        Self { transactions }
    }
}

impl<A: Account + ?Sized> FromIterator<Transaction<A>> for Batch<A> {
    fn from_iter<I: IntoIterator<Item = Transaction<A>>>(iter: I) -> Self {
        Self {
            transactions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BotUser;
    use crate::base::{Points, UserId};
    use std::sync::Arc;

    fn user(balance: Points) -> Arc<BotUser> {
        Arc::new(BotUser::with_balance(UserId(1), balance))
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let batch: Batch<BotUser> = Batch::new();
        assert!(batch.is_empty());
        batch.execute().unwrap();
        batch.undo().unwrap();
        batch.redo().unwrap();
    }

    #[test]
    fn applies_members_in_order() {
        let account = user(0);
        // The withdrawal only succeeds after the deposit.
        let batch = Batch::from(vec![
            Transaction::deposit(Arc::clone(&account), 10),
            Transaction::withdrawal(Arc::clone(&account), 10),
        ]);

        batch.execute().unwrap();
        assert_eq!(account.balance(), 0);
    }

    #[test]
    fn failure_rolls_back_applied_members() {
        let account = user(100);
        let batch: Batch<BotUser> = [50, 51]
            .into_iter()
            .map(|amount| Transaction::withdrawal(Arc::clone(&account), amount))
            .collect();

        assert_eq!(batch.execute(), Err(TransactionError::InsufficientFunds));
        assert_eq!(account.balance(), 100);
    }

    #[test]
    fn failure_on_first_member_changes_nothing() {
        let account = user(5);
        let mut batch = Batch::new();
        batch.push(Transaction::withdrawal(Arc::clone(&account), 6));
        batch.push(Transaction::deposit(Arc::clone(&account), 1));

        assert_eq!(batch.execute(), Err(TransactionError::InsufficientFunds));
        assert_eq!(account.balance(), 5);
    }

    #[test]
    fn undo_reverses_all_members() {
        let account = user(100);
        let batch = Batch::from(vec![
            Transaction::withdrawal(Arc::clone(&account), 10),
            Transaction::withdrawal(Arc::clone(&account), 10),
        ]);

        batch.execute().unwrap();
        assert_eq!(account.balance(), 80);
        batch.undo().unwrap();
        assert_eq!(account.balance(), 100);
        batch.redo().unwrap();
        assert_eq!(account.balance(), 80);
    }

    #[test]
    fn failed_undo_keeps_batch_applied() {
        let first = Arc::new(BotUser::with_balance(UserId(1), 0));
        let second = Arc::new(BotUser::with_balance(UserId(2), 0));
        let batch = Batch::from(vec![
            Transaction::deposit(Arc::clone(&first), 10),
            Transaction::deposit(Arc::clone(&second), 10),
        ]);

        batch.execute().unwrap();
        first.withdraw(10).unwrap();

        assert_eq!(batch.undo(), Err(TransactionError::InsufficientFunds));
        assert_eq!(first.balance(), 0);
        assert_eq!(second.balance(), 10);
    }
}
