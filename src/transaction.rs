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

//! Invertible balance mutations.
//!
//! A [`Transaction`] knows how to apply, invert and reapply itself against the
//! accounts it references. Inverses are recomputed from current balances, not
//! restored from a snapshot:
//!
//! | Variant | execute | undo | redo |
//! |---------|---------|------|------|
//! | Deposit | deposit | withdraw | deposit |
//! | Withdrawal | withdraw | deposit | withdraw |
//! | Transfer | withdraw source, deposit destination | withdraw destination, deposit source | execute |
//! | Batch | members in order, rolled back on failure | members undone in reverse | members redone in order |
//!
//! A redo or undo that withdraws can fail if the balance was changed by
//! something outside the ledger in between.

use crate::account::Account;
use crate::base::Points;
use crate::batch::Batch;
use crate::error::TransactionError;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

pub enum Transaction<A: Account + ?Sized> {
    Deposit {
        account: Arc<A>,
        amount: Points,
    },
    Withdrawal {
        account: Arc<A>,
        amount: Points,
    },
    /// Moves points between two accounts. If the deposit into `to` fails,
    /// the withdrawal from `from` is reversed before the error is returned.
    Transfer {
        from: Arc<A>,
        to: Arc<A>,
        amount: Points,
    },
    Batch(Batch<A>),
}

impl<A: Account + ?Sized> Transaction<A> {
    pub fn deposit(account: Arc<A>, amount: Points) -> Self {
        Self::Deposit { account, amount }
    }

    pub fn withdrawal(account: Arc<A>, amount: Points) -> Self {
        Self::Withdrawal { account, amount }
    }

    pub fn transfer(from: Arc<A>, to: Arc<A>, amount: Points) -> Self {
        Self::Transfer { from, to, amount }
    }

    pub fn execute(&self) -> Result<(), TransactionError> {
        match self {
            Self::Deposit { account, amount } => {
                account.deposit(*amount)?;
                info!("Deposited {self}");
            }
            Self::Withdrawal { account, amount } => {
                account.withdraw(*amount)?;
                info!("Withdrawn {self}");
            }
            Self::Transfer { from, to, amount } => {
                move_points(from.as_ref(), to.as_ref(), *amount)?;
                info!("Transferred {self}");
            }
            Self::Batch(batch) => batch.execute()?,
        }
        Ok(())
    }

    pub fn undo(&self) -> Result<(), TransactionError> {
        match self {
            Self::Deposit { account, amount } => {
                account.withdraw(*amount)?;
                info!("Undid deposit of {self}");
            }
            Self::Withdrawal { account, amount } => {
                account.deposit(*amount)?;
                info!("Undid withdrawal of {self}");
            }
            Self::Transfer { from, to, amount } => {
                move_points(to.as_ref(), from.as_ref(), *amount)?;
                info!("Undid transfer of {self}");
            }
            Self::Batch(batch) => batch.undo()?,
        }
        Ok(())
    }

    pub fn redo(&self) -> Result<(), TransactionError> {
        match self {
            Self::Deposit { account, amount } => {
                account.deposit(*amount)?;
                info!("Redid deposit of {self}");
            }
            Self::Withdrawal { account, amount } => {
                account.withdraw(*amount)?;
                info!("Redid withdrawal of {self}");
            }
            Self::Transfer { from, to, amount } => {
                move_points(from.as_ref(), to.as_ref(), *amount)?;
                info!("Redid transfer of {self}");
            }
            Self::Batch(batch) => batch.redo()?,
        }
        Ok(())
    }

    /// Every account this transaction touches, in order of first appearance.
    ///
    /// Callers use this to persist balances after an undo or redo.
    pub fn accounts(&self) -> Vec<&Arc<A>> {
        let mut accounts: Vec<&Arc<A>> = Vec::new();
        self.collect_accounts(&mut accounts);
        accounts
    }

    fn collect_accounts<'a>(&'a self, out: &mut Vec<&'a Arc<A>>) {
        match self {
            Self::Deposit { account, .. } | Self::Withdrawal { account, .. } => {
                push_unique(out, account)
            }
            Self::Transfer { from, to, .. } => {
                push_unique(out, from);
                push_unique(out, to);
            }
            Self::Batch(batch) => {
                for transaction in batch.iter() {
                    transaction.collect_accounts(out);
                }
            }
        }
    }
}

/// Withdraws from `source` and deposits into `target`, returning the
/// withdrawn points to `source` if the deposit fails.
fn move_points<A: Account + ?Sized>(
    source: &A,
    target: &A,
    amount: Points,
) -> Result<(), TransactionError> {
    source.withdraw(amount)?;
    if let Err(e) = target.deposit(amount) {
        warn!(
            "Returning {amount} points to user {} after failed deposit: {e}",
            source.identity()
        );
        if let Err(restore) = source.deposit(amount) {
            error!(
                "Failed to return {amount} points to user {}: {restore}",
                source.identity()
            );
        }
        return Err(e);
    }
    Ok(())
}

fn push_unique<'a, A: ?Sized>(out: &mut Vec<&'a Arc<A>>, account: &'a Arc<A>) {
    if !out.iter().any(|seen| Arc::ptr_eq(seen, account)) {
        out.push(account);
    }
}

impl<A: Account + ?Sized> From<Batch<A>> for Transaction<A> {
    fn from(batch: Batch<A>) -> Self {
        Self::Batch(batch)
    }
}

/// Human-readable transfer details for log lines.
impl<A: Account + ?Sized> fmt::Display for Transaction<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit { account, amount } => {
                write!(f, "{amount} points to user {}", account.identity())
            }
            Self::Withdrawal { account, amount } => {
                write!(f, "{amount} points from user {}", account.identity())
            }
            Self::Transfer { from, to, amount } => write!(
                f,
                "{amount} points from user {} to user {}",
                from.identity(),
                to.identity()
            ),
            Self::Batch(batch) => write!(f, "batch of {} transactions", batch.len()),
        }
    }
}

impl<A: Account + ?Sized> fmt::Debug for Transaction<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit { account, amount } => f
                .debug_struct("Deposit")
                .field("account", &account.identity())
                .field("amount", amount)
                .finish(),
            Self::Withdrawal { account, amount } => f
                .debug_struct("Withdrawal")
                .field("account", &account.identity())
                .field("amount", amount)
                .finish(),
            Self::Transfer { from, to, amount } => f
                .debug_struct("Transfer")
                .field("from", &from.identity())
                .field("to", &to.identity())
                .field("amount", amount)
                .finish(),
            Self::Batch(batch) => f.debug_list().entries(batch.iter()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BotUser;
    use crate::base::UserId;

    fn user(id: u64, balance: Points) -> Arc<BotUser> {
        Arc::new(BotUser::with_balance(UserId(id), balance))
    }

    #[test]
    fn deposit_execute_undo_redo() {
        let account = user(1, 100);
        let deposit = Transaction::deposit(Arc::clone(&account), 25);

        deposit.execute().unwrap();
        assert_eq!(account.balance(), 125);
        deposit.undo().unwrap();
        assert_eq!(account.balance(), 100);
        deposit.redo().unwrap();
        assert_eq!(account.balance(), 125);
    }

    #[test]
    fn withdrawal_redo_fails_after_external_spend() {
        let account = user(1, 100);
        let withdrawal = Transaction::withdrawal(Arc::clone(&account), 100);

        withdrawal.execute().unwrap();
        withdrawal.undo().unwrap();
        account.withdraw(1).unwrap();

        assert_eq!(withdrawal.redo(), Err(TransactionError::InsufficientFunds));
        assert_eq!(account.balance(), 99);
    }

    #[test]
    fn failed_transfer_leaves_destination_untouched() {
        let from = user(1, 10);
        let to = user(2, 0);
        let transfer = Transaction::transfer(Arc::clone(&from), Arc::clone(&to), 11);

        assert_eq!(transfer.execute(), Err(TransactionError::InsufficientFunds));
        assert_eq!(from.balance(), 10);
        assert_eq!(to.balance(), 0);
    }

    #[test]
    fn failed_transfer_deposit_returns_withdrawn_points() {
        let from = user(1, 10);
        let to = user(2, Points::MAX);
        let transfer = Transaction::transfer(Arc::clone(&from), Arc::clone(&to), 1);

        assert_eq!(transfer.execute(), Err(TransactionError::Overflow));
        assert_eq!(from.balance(), 10);
        assert_eq!(to.balance(), Points::MAX);
    }

    #[test]
    fn failed_transfer_undo_returns_withdrawn_points() {
        let from = user(1, 1);
        let to = user(2, 0);
        let transfer = Transaction::transfer(Arc::clone(&from), Arc::clone(&to), 1);

        transfer.execute().unwrap();
        from.deposit(Points::MAX).unwrap();

        assert_eq!(transfer.undo(), Err(TransactionError::Overflow));
        assert_eq!(from.balance(), Points::MAX);
        assert_eq!(to.balance(), 1);
    }

    #[test]
    fn transfer_undo_fails_when_destination_spent() {
        let from = user(1, 10);
        let to = user(2, 0);
        let transfer = Transaction::transfer(Arc::clone(&from), Arc::clone(&to), 10);

        transfer.execute().unwrap();
        to.withdraw(5).unwrap();

        assert_eq!(transfer.undo(), Err(TransactionError::InsufficientFunds));
        assert_eq!(from.balance(), 0);
        assert_eq!(to.balance(), 5);
    }

    #[test]
    fn describes_accounts_and_amount() {
        let from = user(1, 10);
        let to = user(2, 0);

        assert_eq!(
            Transaction::transfer(Arc::clone(&from), Arc::clone(&to), 5).to_string(),
            "5 points from user 1 to user 2"
        );
        assert_eq!(
            Transaction::deposit(to, 3).to_string(),
            "3 points to user 2"
        );
    }

    #[test]
    fn accounts_are_deduplicated() {
        let a = user(1, 10);
        let b = user(2, 0);
        let batch = Batch::from(vec![
            Transaction::withdrawal(Arc::clone(&a), 1),
            Transaction::deposit(Arc::clone(&b), 1),
            Transaction::transfer(Arc::clone(&b), Arc::clone(&a), 1),
        ]);
        let transaction = Transaction::from(batch);

        let touched = transaction.accounts();
        assert_eq!(touched.len(), 2);
        assert!(Arc::ptr_eq(touched[0], &a));
        assert!(Arc::ptr_eq(touched[1], &b));
    }
}
