//! Ledger state store.
//!
//! Owns the session state: the roster (bank first), the active player
//! pointer and the bounded transaction history. Every read and write of
//! balances goes through [`Ledger`], and [`Ledger::update_balance`] is the
//! only place a balance changes.

pub mod roster;

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::ids::{IdGenerator, UuidIds};
use crate::types::{
    Account, HistoryEntry, NewPlayer, Player, SessionState, BANK_ID, HISTORY_LIMIT,
};

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// In-memory ledger for one table.
///
/// Construct once at startup, hand `&mut` to the transaction engine and the
/// console, and snapshot it with [`Ledger::state`] for persistence.
#[derive(Debug)]
pub struct Ledger {
    state: SessionState,
    ids: Box<dyn IdGenerator>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Bank-only ledger with UUID-backed player ids.
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIds))
    }

    pub fn with_ids(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            state: SessionState::default(),
            ids,
        }
    }

    /// Current session state, as it would be persisted.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active_player_id(&self) -> &str {
        &self.state.active_player_id
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.get_player_by_id(&self.state.active_player_id)
    }

    /// History, newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    /// Seat a new game: bank plus `players`, all at `starting_balance`.
    ///
    /// The first given player becomes active (the bank if the list is
    /// empty). History is cleared. Callers are expected to pass at least
    /// two players.
    pub fn set_game(&mut self, players: Vec<NewPlayer>, starting_balance: u64) {
        let ids = &self.ids;
        let seated: Vec<Player> = players
            .into_iter()
            .map(|profile| {
                let id = ids.next_id(&profile.name);
                Player::with_balance(id, profile, starting_balance)
            })
            .collect();

        self.state.active_player_id = seated
            .first()
            .map(|p| p.id.clone())
            .unwrap_or_else(|| BANK_ID.to_string());
        self.state.players = std::iter::once(Player::bank()).chain(seated).collect();
        self.state.history.clear();
        self.state.started = true;

        info!(
            players = self.state.players.len() - 1,
            starting_balance,
            active = %self.state.active_player_id,
            "Game started"
        );
    }

    /// Select the active player. Unknown ids are ignored and return `false`.
    pub fn set_active_player(&mut self, id: &str) -> bool {
        if self.get_player_by_id(id).is_none() {
            debug!(id, "Ignoring unknown active player");
            return false;
        }
        self.state.active_player_id = id.to_string();
        true
    }

    pub fn get_player_by_id(&self, id: &str) -> Option<&Player> {
        self.state.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.state.players.iter_mut().find(|p| p.id == id)
    }

    /// Apply `delta` to a player's balance.
    ///
    /// Returns `false` and changes nothing if the player is missing, is the
    /// bank, or the result would be negative or overflow.
    pub fn update_balance(&mut self, id: &str, delta: i64) -> bool {
        let Some(player) = self.player_mut(id) else {
            debug!(id, delta, "Balance update for unknown player");
            return false;
        };
        let Account::Funds { balance } = &mut player.account else {
            debug!(id, delta, "Balance update refused for bank");
            return false;
        };

        match balance.checked_add_signed(delta) {
            Some(next) => {
                debug!(id, delta, before = *balance, after = next, "Balance updated");
                *balance = next;
                true
            }
            None => {
                debug!(id, delta, balance = *balance, "Balance update out of range");
                false
            }
        }
    }

    /// Record an entry at the front of the history, dropping the oldest
    /// past [`HISTORY_LIMIT`].
    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.state.history.insert(0, entry);
        self.state.history.truncate(HISTORY_LIMIT);
    }

    pub fn clear_history(&mut self) {
        let dropped = self.state.history.len();
        self.state.history.clear();
        info!(dropped, "History cleared");
    }

    /// Players in table order, bank first when included.
    pub fn list_players(&self, include_bank: bool) -> Vec<&Player> {
        self.state
            .players
            .iter()
            .filter(|p| include_bank || !p.is_bank())
            .collect()
    }

    /// Adopt a restored state, repairing whatever does not hold.
    ///
    /// The bank ends up first and canonical, duplicate ids and stray bank
    /// accounts are dropped, a dangling active id falls back to the first
    /// seat, and history is cut to [`HISTORY_LIMIT`].
    pub fn replace_state(&mut self, candidate: SessionState) {
        let mut state = candidate;

        let before = state.players.len();
        let mut seen: HashSet<String> = HashSet::new();
        state.players.retain(|p| {
            if p.id != BANK_ID && p.is_bank() {
                return false;
            }
            seen.insert(p.id.clone())
        });
        if state.players.len() != before {
            warn!(
                dropped = before - state.players.len(),
                "Dropped duplicate or invalid players from restored state"
            );
        }

        match state.players.iter().position(|p| p.id == BANK_ID) {
            Some(index) => {
                state.players.remove(index);
            }
            None => warn!("Restored state had no bank entry"),
        }
        state.players.insert(0, Player::bank());

        if !state.players.iter().any(|p| p.id == state.active_player_id) {
            let fallback = first_seat_id(&state.players);
            warn!(
                missing = %state.active_player_id,
                fallback = %fallback,
                "Active player not found, repaired"
            );
            state.active_player_id = fallback;
        }

        state.history.truncate(HISTORY_LIMIT);
        self.state = state;

        info!(state = %self.state, "State restored");
    }

    /// Back to the bank-only default.
    pub fn reset_state(&mut self) {
        self.state = SessionState::default();
        info!("State reset");
    }
}

/// Id of the first non-bank player, or the bank when the table is empty.
pub(crate) fn first_seat_id(players: &[Player]) -> String {
    players
        .iter()
        .find(|p| !p.is_bank())
        .map(|p| p.id.clone())
        .unwrap_or_else(|| BANK_ID.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
