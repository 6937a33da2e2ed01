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

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use points_ledger::logging::init_logging;
use points_ledger::{BotConfig, Chatter, InMemoryUserStore, PointsBot, UserId, UserStore};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, info, warn};

/// Points Ledger - Replay chat events against the point ledger
///
/// Reads chat events from a CSV file and outputs user balances to stdout.
/// Supports chat messages, gamble, give, undo and redo.
#[derive(Parser, Debug)]
#[command(name = "points-ledger")]
#[command(about = "Replays chat bot point commands from a CSV file", long_about = None)]
struct Args {
    /// Path to CSV file with chat events
    ///
    /// Expected format: event,user,target,arg
    /// Example: cargo run -- events.csv > balances.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Bot configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for gamble outcomes, for reproducible replays
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let config = match BotConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {e}");
            process::exit(1);
        }
    };

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            error!("Error opening file '{}': {e}", args.input.display());
            process::exit(1);
        }
    };

    let store = InMemoryUserStore::new();
    let mut bot = match args.seed {
        Some(seed) => PointsBot::with_seed(store, config, seed),
        None => PointsBot::new(store, config),
    };

    if let Err(e) = replay_events(&mut bot, BufReader::new(file)) {
        error!("Error processing events: {e}");
        process::exit(1);
    }

    if let Err(e) = write_balances(bot.store(), std::io::stdout()) {
        error!("Error writing output: {e}");
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `event, user, target, arg`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    event: String,
    user: u64,
    #[serde(deserialize_with = "csv::invalid_option")]
    target: Option<u64>,
    arg: Option<String>,
}

/// A chat event the bot reacts to.
#[derive(Debug, PartialEq, Eq)]
enum Event {
    Message { author: Chatter, content: String },
    Gamble { author: Chatter, amount: String },
    Give { author: Chatter, target: UserId, amount: String },
    Undo { author: Chatter },
    Redo { author: Chatter },
}

impl CsvRecord {
    /// Converts CSV record to an event.
    ///
    /// Returns `None` for unknown events or missing required fields.
    fn into_event(self) -> Option<Event> {
        let author = Chatter::new(UserId(self.user));
        let arg = self.arg.filter(|arg| !arg.is_empty());

        match self.event.to_lowercase().as_str() {
            "message" => Some(Event::Message {
                author,
                content: arg.unwrap_or_default(),
            }),
            "gamble" => Some(Event::Gamble {
                author,
                amount: arg?,
            }),
            "give" => Some(Event::Give {
                author,
                target: UserId(self.target?),
                amount: arg?,
            }),
            "undo" => Some(Event::Undo { author }),
            "redo" => Some(Event::Redo { author }),
            _ => None,
        }
    }
}

/// Replays events from a CSV reader.
///
/// Malformed rows, unknown events and failed commands are logged and skipped;
/// only a broken reader stops the replay.
///
/// # CSV Format
///
/// ```csv
/// event,user,target,arg
/// message,1,,hello chat
/// gamble,1,,10%
/// give,1,2,half
/// undo,99,,
/// ```
pub fn replay_events<S: UserStore, R: Read>(
    bot: &mut PointsBot<S>,
    reader: R,
) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed row: {e}");
                continue;
            }
        };

        let Some(event) = record.into_event() else {
            warn!("Skipping invalid event record");
            continue;
        };
        debug!("Replaying {event:?}");

        let outcome = match event {
            Event::Message { author, content } => {
                bot.on_message(Some(&author), &content);
                Ok(())
            }
            Event::Gamble { author, amount } => bot.gamble(&author, &amount).map(|_| ()),
            Event::Give {
                author,
                target,
                amount,
            } => bot.give(&author, target, &amount).map(|_| ()),
            Event::Undo { author } => bot.undo(&author).map(|_| ()),
            Event::Redo { author } => bot.redo(&author).map(|_| ()),
        };

        if let Err(e) = outcome {
            info!("Command failed: {e} (reply: {})", e.chat_message());
        }
    }

    Ok(())
}

/// Writes every stored user's balance as CSV.
///
/// Columns: `user, balance`
pub fn write_balances<S: UserStore, W: Write>(
    store: &S,
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = Writer::from_writer(writer);

    for user in store.users()? {
        wtr.serialize(&*user)?;
    }

    wtr.flush()?;
    Ok(())
}
