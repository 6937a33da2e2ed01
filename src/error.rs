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

//! Error types for the ledger, the amount parser and the bot commands.
//!
//! Every error a viewer can trigger carries a `chat_message()`, the reply the
//! chat layer should send back instead of the internal description.

use thiserror::Error;

/// Balance mutation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Withdrawal would exceed the current balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Amount is negative
    #[error("invalid amount (must not be negative)")]
    InvalidAmount,

    /// Balance would leave the representable point range
    #[error("balance overflow")]
    Overflow,
}

impl TransactionError {
    pub fn chat_message(&self) -> &'static str {
        match self {
            Self::InsufficientFunds => "You don't have enough coins",
            Self::InvalidAmount | Self::Overflow => "An invalid point amount was passed",
        }
    }
}

/// Point amount parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is too long")]
    TooLong,

    #[error("invalid number of points")]
    InvalidNumber,

    #[error("invalid percentage")]
    InvalidPercentage,

    /// Relative amounts need a balance to be computed against
    #[error("not a valid user")]
    MissingAccount,

    #[error("amount is too large")]
    TooLarge,

    #[error("not a valid amount")]
    Unrecognized,
}

impl AmountError {
    pub fn chat_message(&self) -> &'static str {
        "An invalid point amount was passed"
    }
}

/// User store failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by bot commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Command restricted to moderators and bot admins
    #[error("not permitted")]
    NotPermitted,
}

impl BotError {
    pub fn chat_message(&self) -> &'static str {
        match self {
            Self::Transaction(e) => e.chat_message(),
            Self::Amount(e) => e.chat_message(),
            Self::Store(_) => "Something went wrong",
            Self::NotPermitted => "Only mods are allowed to do this",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            TransactionError::InsufficientFunds.to_string(),
            "insufficient funds"
        );
        assert_eq!(
            TransactionError::InvalidAmount.to_string(),
            "invalid amount (must not be negative)"
        );
        assert_eq!(AmountError::TooLong.to_string(), "amount is too long");
        assert_eq!(AmountError::Unrecognized.to_string(), "not a valid amount");
        assert_eq!(
            StoreError::Unavailable("db down".into()).to_string(),
            "user store unavailable: db down"
        );
    }

    #[test]
    fn bot_error_is_transparent() {
        let error: BotError = TransactionError::InsufficientFunds.into();
        assert_eq!(error.to_string(), "insufficient funds");
        assert_eq!(error.chat_message(), "You don't have enough coins");

        let error: BotError = AmountError::MissingAccount.into();
        assert_eq!(error.chat_message(), "An invalid point amount was passed");
    }
}
