//! Terminal console — the table-side front end.
//!
//! Reads one command per line, runs it against the ledger through the
//! transaction engine, prints the result, and saves the state after every
//! command that changed it. Refused commands print the reason and leave
//! both the ledger and the saved state alone.

pub mod commands;
pub mod render;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::dice;
use crate::engine::amount::parse_amount;
use crate::engine::TransactionEngine;
use crate::ledger::roster::{clean_name, default_profile, MAX_PLAYERS, MIN_PLAYERS};
use crate::ledger::Ledger;
use crate::storage::StateRepository;
use crate::types::{BankerError, HistoryEntry, NewPlayer};
use commands::{parse_line, Command};

/// What the caller should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(String),
    Quit(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Continue(text) | Reply::Quit(text) => text,
        }
    }
}

/// Result of a command that ran.
enum Step {
    /// Nothing changed.
    View(String),
    /// The ledger changed and must be saved.
    Changed(String),
    Quit,
}

pub struct Console {
    ledger: Ledger,
    engine: TransactionEngine,
    store: Box<dyn StateRepository>,
    game: GameConfig,
    rng: StdRng,
    last_leader: Option<String>,
}

impl Console {
    pub fn new(
        ledger: Ledger,
        engine: TransactionEngine,
        store: Box<dyn StateRepository>,
        game: GameConfig,
    ) -> Self {
        let last_leader = if ledger.is_started() { ledger.leader_id() } else { None };
        Self {
            ledger,
            engine,
            store,
            game,
            rng: StdRng::from_entropy(),
            last_leader,
        }
    }

    /// Replace the dice RNG, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<()> {
        if self.ledger.is_started() {
            writeln!(output, "{}", render::players(&self.ledger))?;
        } else {
            writeln!(output, "No game in progress. Try `setup Ana Bia` or `help`.")?;
        }

        write!(output, "> ")?;
        output.flush()?;
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            let reply = self.handle_line(&line);
            if !reply.text().is_empty() {
                writeln!(output, "{}", reply.text())?;
            }
            if let Reply::Quit(_) = reply {
                return Ok(());
            }
            write!(output, "> ")?;
            output.flush()?;
        }
        writeln!(output)?;
        Ok(())
    }

    /// Run one line of input.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::Continue(String::new());
        }
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(text) => return Reply::Continue(text),
        };
        debug!(?command, "Console command");

        match self.execute(command) {
            Ok(Step::View(text)) => Reply::Continue(text),
            Ok(Step::Changed(text)) => {
                self.store.save(self.ledger.state());
                match self.leader_change() {
                    Some(banner) => Reply::Continue(format!("{text}\n{banner}")),
                    None => Reply::Continue(text),
                }
            }
            Ok(Step::Quit) => Reply::Quit("Bye!".to_string()),
            Err(reason) => Reply::Continue(format!("⚠️  {reason}")),
        }
    }

    fn execute(&mut self, command: Command) -> Result<Step, String> {
        match command {
            Command::Setup { balance, names } => self.setup(balance.as_deref(), names),
            Command::Players => Ok(Step::View(render::players(&self.ledger))),
            Command::History { count } => Ok(Step::View(render::history(
                self.ledger.history(),
                count.unwrap_or(self.game.history_lines),
            ))),
            Command::Leaderboard => Ok(Step::View(render::leaderboard(&self.ledger.standings()))),
            Command::Roll => Ok(Step::View(format!("🎲 {}", dice::roll(&mut self.rng)))),
            Command::Reset => {
                self.ledger.reset_state();
                self.store.clear();
                self.last_leader = None;
                Ok(Step::View("Game discarded.".to_string()))
            }
            Command::Quit => Ok(Step::Quit),
            Command::Active { player } => {
                self.require_game()?;
                let id = self.resolve(&player);
                if !self.ledger.set_active_player(&id) {
                    return Err(unknown(&player));
                }
                Ok(Step::Changed(render::players(&self.ledger)))
            }
            Command::Receive { amount, player } => {
                self.require_game()?;
                let id = self.resolve_or_active(player.as_deref());
                let amount = parse_amount(&amount).map_err(|e| e.to_string())?;
                let entry = self
                    .engine
                    .receive_from_bank(&mut self.ledger, &id, amount as f64);
                recorded(entry)
            }
            Command::Pay { amount, player } => {
                self.require_game()?;
                let id = self.resolve_or_active(player.as_deref());
                let amount = parse_amount(&amount).map_err(|e| e.to_string())?;
                let entry = self.engine.pay_to_bank(&mut self.ledger, &id, amount as f64);
                recorded(entry)
            }
            Command::Transfer { from, to, amount } => {
                self.require_game()?;
                let from = self.resolve(&from);
                let to = self.resolve(&to);
                let amount = parse_amount(&amount).map_err(|e| e.to_string())?;
                let entry = self.engine.transfer_between_players(
                    &mut self.ledger,
                    &from,
                    &to,
                    amount as f64,
                );
                recorded(entry)
            }
            Command::Rename { player, name } => {
                self.require_game()?;
                let id = self.resolve(&player);
                if !self.ledger.rename_player(&id, &name) {
                    return Err(unknown(&player));
                }
                Ok(Step::Changed(render::players(&self.ledger)))
            }
            Command::Color { player, color } => {
                self.require_game()?;
                let id = self.resolve(&player);
                if !self.ledger.recolor_player(&id, &color) {
                    return Err(unknown(&player));
                }
                Ok(Step::Changed(render::players(&self.ledger)))
            }
            Command::Avatar { player, avatar } => {
                self.require_game()?;
                let id = self.resolve(&player);
                if !self.ledger.set_avatar(&id, &avatar) {
                    return Err(unknown(&player));
                }
                Ok(Step::Changed(render::players(&self.ledger)))
            }
            Command::Add { name } => {
                self.require_game()?;
                let profile = NewPlayer {
                    name: name.unwrap_or_default(),
                    ..NewPlayer::default()
                };
                self.ledger
                    .add_player(profile, self.game.new_player_balance)
                    .ok_or_else(|| format!("Maximum of {MAX_PLAYERS} players."))?;
                Ok(Step::Changed(render::players(&self.ledger)))
            }
            Command::Remove { player } => {
                self.require_game()?;
                let id = self.resolve(&player);
                match self.ledger.get_player_by_id(&id) {
                    Some(p) if !p.is_bank() => {}
                    _ => return Err(unknown(&player)),
                }
                if !self.ledger.remove_player(&id) {
                    return Err(format!("A game needs at least {MIN_PLAYERS} players."));
                }
                Ok(Step::Changed(render::players(&self.ledger)))
            }
            Command::ClearHistory => {
                self.require_game()?;
                self.ledger.clear_history();
                Ok(Step::Changed("History cleared.".to_string()))
            }
        }
    }

    fn setup(&mut self, balance: Option<&str>, names: Vec<String>) -> Result<Step, String> {
        let starting_balance = match balance {
            Some(raw) => parse_amount(raw).map_err(|e| e.to_string())?,
            None => self.game.starting_balance,
        };
        if starting_balance == 0 {
            return Err("Starting balance must be positive.".to_string());
        }

        let names: Vec<String> = names.iter().filter_map(|n| clean_name(n)).collect();
        if names.len() < MIN_PLAYERS {
            return Err(format!("A game needs at least {MIN_PLAYERS} players."));
        }
        if names.len() > MAX_PLAYERS {
            return Err(format!("Maximum of {MAX_PLAYERS} players."));
        }

        let profiles = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| NewPlayer {
                name,
                ..default_profile(i)
            })
            .collect();
        self.ledger.set_game(profiles, starting_balance);
        self.last_leader = None;

        info!(starting_balance, "New game from console");
        Ok(Step::Changed(render::players(&self.ledger)))
    }

    fn require_game(&self) -> Result<(), String> {
        if self.ledger.is_started() {
            Ok(())
        } else {
            Err("No game in progress. Start one with `setup`.".to_string())
        }
    }

    /// Match an id, or a name case-insensitively. Unmatched input is passed
    /// through so the engine reports it as an invalid player.
    fn resolve(&self, query: &str) -> String {
        let query = query.trim();
        let players = self.ledger.list_players(true);
        if let Some(p) = players.iter().find(|p| p.id == query) {
            return p.id.clone();
        }
        players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(query))
            .map(|p| p.id.clone())
            .unwrap_or_else(|| query.to_string())
    }

    fn resolve_or_active(&self, query: Option<&str>) -> String {
        match query {
            Some(q) => self.resolve(q),
            None => self.ledger.active_player_id().to_string(),
        }
    }

    /// Banner text when the leader changed since the last check.
    fn leader_change(&mut self) -> Option<String> {
        if !self.ledger.is_started() {
            self.last_leader = None;
            return None;
        }
        let leader = self.ledger.leader_id()?;
        let previous = self.last_leader.replace(leader.clone());
        match previous {
            Some(prev) if prev != leader => {
                let name = self.ledger.get_player_by_id(&leader)?.name.clone();
                Some(format!("👑 New leader: {name}"))
            }
            _ => None,
        }
    }
}

fn recorded(entry: Result<HistoryEntry, BankerError>) -> Result<Step, String> {
    let entry = entry.map_err(|e| e.to_string())?;
    Ok(Step::Changed(render::entry(&entry)))
}

fn unknown(query: &str) -> String {
    BankerError::InvalidPlayer(query.to_string()).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
