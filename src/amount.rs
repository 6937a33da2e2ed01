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

//! Point amount parsing.
//!
//! Viewers type amounts as plain numbers (`10`), percentages of their balance
//! (`10%`) or keywords (`all`, `half`). [`AmountParser::convert`] turns any of
//! those into an absolute number of points.
//!
//! # Example
//!
//! ```
//! use points_ledger::{AmountParser, BotUser, UserId};
//!
//! let user = BotUser::with_balance(UserId(1), 45);
//! assert_eq!(AmountParser::convert("10", Some(&user)).unwrap(), 10);
//! assert_eq!(AmountParser::convert("10%", Some(&user)).unwrap(), 4);
//! assert_eq!(AmountParser::convert("half", Some(&user)).unwrap(), 22);
//! ```

use crate::account::Account;
use crate::base::Points;
use crate::error::AmountError;

/// Converts user-supplied amount strings into points.
pub struct AmountParser;

impl AmountParser {
    /// Longest accepted input, in characters.
    pub const MAX_LEN: usize = 20;

    /// Converts `raw` into a point amount.
    ///
    /// Plain numbers need no account. Percentages and keywords are computed
    /// against `account`'s balance; the account is only read.
    ///
    /// # Errors
    ///
    /// - [`AmountError::TooLong`] - input exceeds [`Self::MAX_LEN`] characters.
    /// - [`AmountError::MissingAccount`] - relative amount without an account.
    /// - [`AmountError::InvalidPercentage`] - `%` suffix on a non-integer.
    ///
    /// A signed percentage such as `-10%` yields a negative amount, which
    /// accounts reject when it reaches them.
    /// - [`AmountError::TooLarge`] - percentage result overflows.
    /// - [`AmountError::Unrecognized`] - anything else.
    pub fn convert<A>(raw: &str, account: Option<&A>) -> Result<Points, AmountError>
    where
        A: Account + ?Sized,
    {
        if raw.chars().count() > Self::MAX_LEN {
            return Err(AmountError::TooLong);
        }

        if is_digits(raw) {
            return raw.parse().map_err(|_| AmountError::InvalidNumber);
        }

        let account = account.ok_or(AmountError::MissingAccount)?;

        if let Some(percentage) = raw.strip_suffix('%') {
            return Self::from_percentage(percentage, account.balance());
        }

        match raw {
            "all" => Ok(account.balance()),
            "half" => Ok(account.balance() / 2),
            _ => Err(AmountError::Unrecognized),
        }
    }

    fn from_percentage(percentage: &str, balance: Points) -> Result<Points, AmountError> {
        let percentage: Points = percentage
            .parse()
            .map_err(|_| AmountError::InvalidPercentage)?;

        // Integer division truncates toward zero.
        balance
            .checked_mul(percentage)
            .map(|scaled| scaled / 100)
            .ok_or(AmountError::TooLarge)
    }
}

fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BotUser;
    use crate::base::UserId;

    fn user(balance: Points) -> BotUser {
        BotUser::with_balance(UserId(1), balance)
    }

    #[test]
    fn digits_need_no_account() {
        assert_eq!(AmountParser::convert::<BotUser>("10", None), Ok(10));
        assert_eq!(AmountParser::convert::<BotUser>("007", None), Ok(7));
    }

    #[test]
    fn percentage_truncates() {
        assert_eq!(AmountParser::convert("10%", Some(&user(45))), Ok(4));
        assert_eq!(AmountParser::convert("0%", Some(&user(45))), Ok(0));
        assert_eq!(AmountParser::convert("200%", Some(&user(45))), Ok(90));
    }

    #[test]
    fn signed_percentage_truncates_toward_zero() {
        assert_eq!(AmountParser::convert("-10%", Some(&user(45))), Ok(-4));
        assert_eq!(AmountParser::convert("+10%", Some(&user(45))), Ok(4));
    }

    #[test]
    fn empty_or_fractional_percentage_is_invalid() {
        assert_eq!(
            AmountParser::convert("%", Some(&user(45))),
            Err(AmountError::InvalidPercentage)
        );
        assert_eq!(
            AmountParser::convert("1.5%", Some(&user(45))),
            Err(AmountError::InvalidPercentage)
        );
    }

    #[test]
    fn percentage_overflow_is_too_large() {
        let rich = user(Points::MAX / 2);
        assert_eq!(
            AmountParser::convert("1000%", Some(&rich)),
            Err(AmountError::TooLarge)
        );
    }

    #[test]
    fn length_is_checked_first() {
        let long = "a".repeat(21);
        assert_eq!(
            AmountParser::convert::<BotUser>(&long, None),
            Err(AmountError::TooLong)
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            AmountParser::convert::<BotUser>("", None),
            Err(AmountError::MissingAccount)
        );
        assert_eq!(
            AmountParser::convert("", Some(&user(10))),
            Err(AmountError::Unrecognized)
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            AmountParser::convert("ALL", Some(&user(10))),
            Err(AmountError::Unrecognized)
        );
    }
}
