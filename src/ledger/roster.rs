//! Roster editing and the leaderboard.
//!
//! Edits that cannot apply (unknown id, the bank, table limits) are no-ops
//! that return `false` or `None`; they are never errors.

use tracing::{debug, info};

use super::{first_seat_id, Ledger};
use crate::types::{NewPlayer, Player, Standing};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;
pub const NAME_MAX_CHARS: usize = 16;

pub const PLAYER_COLORS: &[&str] = &[
    "#ef4444", "#3b82f6", "#22c55e", "#f59e0b", "#a855f7", "#06b6d4", "#ec4899", "#84cc16",
];

pub const PLAYER_AVATARS: &[&str] = &["🦊", "🐯", "🐼", "🐸", "🐙", "🦁", "🐵", "🦄", "🐺", "🐧"];

/// Default profile for the seat at `index` (0-based).
pub fn default_profile(index: usize) -> NewPlayer {
    NewPlayer::new(
        default_name(index),
        PLAYER_COLORS[index % PLAYER_COLORS.len()],
        PLAYER_AVATARS[index % PLAYER_AVATARS.len()],
    )
}

fn default_name(index: usize) -> String {
    format!("Player {}", index + 1)
}

/// Trimmed and clipped name, or `None` if nothing is left.
pub fn clean_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(NAME_MAX_CHARS).collect())
    }
}

/// The player's avatar, or one derived from their id when unset.
pub fn avatar_for(player: &Player) -> &str {
    if !player.avatar.is_empty() {
        return &player.avatar;
    }
    let hash: usize = player.id.chars().map(|c| c as usize).sum();
    PLAYER_AVATARS[hash % PLAYER_AVATARS.len()]
}

impl Ledger {
    fn seat_count(&self) -> usize {
        self.state.players.iter().filter(|p| !p.is_bank()).count()
    }

    fn seat_index(&self, id: &str) -> Option<usize> {
        self.state
            .players
            .iter()
            .filter(|p| !p.is_bank())
            .position(|p| p.id == id)
    }

    /// Rename a seat. A blank name becomes `Player N`.
    pub fn rename_player(&mut self, id: &str, name: &str) -> bool {
        let Some(index) = self.seat_index(id) else {
            return false;
        };
        let name = clean_name(name).unwrap_or_else(|| default_name(index));
        match self.player_mut(id) {
            Some(player) => {
                debug!(id, from = %player.name, to = %name, "Player renamed");
                player.name = name;
                true
            }
            None => false,
        }
    }

    pub fn recolor_player(&mut self, id: &str, color: &str) -> bool {
        let color = color.trim();
        if color.is_empty() {
            return false;
        }
        match self.player_mut(id) {
            Some(player) if !player.is_bank() => {
                player.color = color.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_avatar(&mut self, id: &str, avatar: &str) -> bool {
        let avatar = avatar.trim();
        if avatar.is_empty() {
            return false;
        }
        match self.player_mut(id) {
            Some(player) if !player.is_bank() => {
                player.avatar = avatar.to_string();
                true
            }
            _ => false,
        }
    }

    /// Seat another player at `balance`. Blank profile fields take the
    /// defaults for the new seat. Returns the new id, or `None` when the
    /// table is full.
    pub fn add_player(&mut self, profile: NewPlayer, balance: u64) -> Option<String> {
        let index = self.seat_count();
        if index >= MAX_PLAYERS {
            debug!(max = MAX_PLAYERS, "Table full, player not added");
            return None;
        }

        let defaults = default_profile(index);
        let profile = NewPlayer {
            name: clean_name(&profile.name).unwrap_or(defaults.name),
            color: if profile.color.trim().is_empty() { defaults.color } else { profile.color },
            avatar: if profile.avatar.trim().is_empty() { defaults.avatar } else { profile.avatar },
        };

        let id = self.ids.next_id(&profile.name);
        info!(id = %id, name = %profile.name, balance, "Player added");
        self.state
            .players
            .push(Player::with_balance(id.clone(), profile, balance));
        Some(id)
    }

    /// Remove a seat and its balance. Refused for the bank and when the
    /// table would drop below [`MIN_PLAYERS`].
    pub fn remove_player(&mut self, id: &str) -> bool {
        if self.seat_index(id).is_none() || self.seat_count() <= MIN_PLAYERS {
            return false;
        }

        self.state.players.retain(|p| p.id != id);
        if self.state.active_player_id == id {
            self.state.active_player_id = first_seat_id(&self.state.players);
        }
        info!(id, remaining = self.seat_count(), "Player removed");
        true
    }

    /// Seats ranked by balance, richest first. Ties keep table order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut seats: Vec<(&Player, u64)> = self
            .state
            .players
            .iter()
            .filter_map(|p| p.balance().map(|b| (p, b)))
            .collect();
        seats.sort_by(|a, b| b.1.cmp(&a.1));

        seats
            .into_iter()
            .enumerate()
            .map(|(i, (player, balance))| Standing {
                rank: i + 1,
                id: player.id.clone(),
                name: player.name.clone(),
                color: player.color.clone(),
                avatar: avatar_for(player).to_string(),
                balance,
            })
            .collect()
    }

    /// Id of the current leader, if anyone is seated.
    pub fn leader_id(&self) -> Option<String> {
        self.standings().into_iter().next().map(|s| s.id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
