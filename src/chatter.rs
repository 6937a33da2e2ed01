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

//! Message authors and permission checks.

use crate::base::UserId;
use crate::config::BotConfig;

/// The author of a chat message, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chatter {
    pub id: UserId,
    pub is_mod: bool,
}

impl Chatter {
    pub fn new(id: UserId) -> Self {
        Self { id, is_mod: false }
    }

    pub fn moderator(id: UserId) -> Self {
        Self { id, is_mod: true }
    }
}

pub fn is_bot_admin(chatter: &Chatter, config: &BotConfig) -> bool {
    config.is_admin(chatter.id)
}

pub fn is_bot_admin_or_mod(chatter: &Chatter, config: &BotConfig) -> bool {
    chatter.is_mod || is_bot_admin(chatter, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_admin(id: u64) -> BotConfig {
        BotConfig {
            admins: vec![UserId(id)],
            ..BotConfig::default()
        }
    }

    #[test]
    fn neither_admin_nor_mod() {
        let config = config_with_admin(1);
        assert!(!is_bot_admin_or_mod(&Chatter::new(UserId(2)), &config));
    }

    #[test]
    fn mod_but_not_admin() {
        let config = config_with_admin(1);
        let chatter = Chatter::moderator(UserId(2));
        assert!(!is_bot_admin(&chatter, &config));
        assert!(is_bot_admin_or_mod(&chatter, &config));
    }

    #[test]
    fn admin_but_not_mod() {
        let config = config_with_admin(1);
        assert!(is_bot_admin_or_mod(&Chatter::new(UserId(1)), &config));
    }

    #[test]
    fn admin_and_mod() {
        let config = config_with_admin(1);
        assert!(is_bot_admin_or_mod(&Chatter::moderator(UserId(1)), &config));
    }
}
