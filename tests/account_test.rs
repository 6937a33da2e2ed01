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

//! Account public API integration tests.

use points_ledger::{Account, BotUser, TransactionError, UserId};
use std::sync::Arc;
use std::thread;

#[test]
fn new_user_has_zero_balance() {
    let user = BotUser::new(UserId(1));
    assert_eq!(user.balance(), 0);
    assert!(user.is_rewardable());
    assert_eq!(user.identity(), "1");
}

#[test]
fn failed_withdrawal_keeps_balance() {
    let user = BotUser::with_balance(UserId(1), 10);
    assert_eq!(user.withdraw(11), Err(TransactionError::InsufficientFunds));
    assert_eq!(user.balance(), 10);
}

#[test]
fn concurrent_deposits_are_all_applied() {
    let user = Arc::new(BotUser::new(UserId(1)));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let user = Arc::clone(&user);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    user.deposit(1).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(user.balance(), 8_000);
}

#[test]
fn concurrent_withdrawals_never_overdraw() {
    let user = Arc::new(BotUser::with_balance(UserId(1), 500));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let user = Arc::clone(&user);
            thread::spawn(move || (0..100).filter(|_| user.withdraw(1).is_ok()).count())
        })
        .collect();

    let succeeded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(succeeded, 500);
    assert_eq!(user.balance(), 0);
}
