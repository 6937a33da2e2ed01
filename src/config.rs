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

//! Bot configuration.
//!
//! Values come from an optional TOML file, then `POINTS_BOT_*` environment
//! variables (e.g. `POINTS_BOT_CHAT_REWARD=2`). Every field has a default.

use crate::base::UserId;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Points paid for each chat message that is not a command.
    pub chat_reward: u32,
    /// Messages starting with this prefix are commands.
    pub command_prefix: String,
    /// Users allowed to run admin commands without being moderators.
    pub admins: Vec<UserId>,
    /// Users that never receive chat rewards, typically other bots.
    pub ignored_users: Vec<UserId>,
    pub leaderboard_size: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            chat_reward: 1,
            command_prefix: "$".to_string(),
            admins: Vec::new(),
            ignored_users: Vec::new(),
            leaderboard_size: 5,
        }
    }
}

impl BotConfig {
    const ENV_PREFIX: &'static str = "POINTS_BOT";

    /// Loads the configuration from `path` (if any) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder
            .add_source(Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Parses a TOML document, ignoring the environment.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn is_admin(&self, id: UserId) -> bool {
        self.admins.contains(&id)
    }

    pub fn is_ignored(&self, id: UserId) -> bool {
        self.ignored_users.contains(&id)
    }
}
