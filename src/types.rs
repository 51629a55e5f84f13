//! Shared types for the BANKER ledger.
//!
//! These types form the data model used by the ledger, the transaction
//! engine, persistence and the console. Everything here serialises to the
//! JSON shape written to the state file, so field names are part of the
//! on-disk format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Sentinel id of the bank entry.
pub const BANK_ID: &str = "bank";
pub const BANK_NAME: &str = "Bank";
pub const BANK_COLOR: &str = "#0f766e";
pub const BANK_AVATAR: &str = "🏦";

/// Maximum number of history entries kept (newest first).
pub const HISTORY_LIMIT: usize = 200;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// What a player's money is held in.
///
/// The bank has unbounded funds and is never debited or credited through
/// the balance path; everyone else holds a non-negative integer balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Account {
    Bank,
    Funds { balance: u64 },
}

impl Account {
    /// Spendable balance, or `None` for the bank.
    pub fn balance(&self) -> Option<u64> {
        match self {
            Account::Bank => None,
            Account::Funds { balance } => Some(*balance),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Bank => write!(f, "$∞"),
            Account::Funds { balance } => write!(f, "{}", format_money(*balance)),
        }
    }
}

/// Format an amount as `$1,500`.
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// A seat at the table, or the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub avatar: String,
    pub account: Account,
}

impl Player {
    /// The canonical bank entry.
    pub fn bank() -> Self {
        Self {
            id: BANK_ID.to_string(),
            name: BANK_NAME.to_string(),
            color: BANK_COLOR.to_string(),
            avatar: BANK_AVATAR.to_string(),
            account: Account::Bank,
        }
    }

    pub fn with_balance(id: String, profile: NewPlayer, balance: u64) -> Self {
        Self {
            id,
            name: profile.name,
            color: profile.color,
            avatar: profile.avatar,
            account: Account::Funds { balance },
        }
    }

    pub fn is_bank(&self) -> bool {
        matches!(self.account, Account::Bank)
    }

    /// Spendable balance, or `None` for the bank.
    pub fn balance(&self) -> Option<u64> {
        self.account.balance()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.avatar.is_empty() {
            write!(f, "{} {}", self.name, self.account)
        } else {
            write!(f, "{} {} {}", self.avatar, self.name, self.account)
        }
    }
}

/// Profile used to seat a new player. Ids and balances are assigned by the
/// ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub color: String,
    pub avatar: String,
}

impl NewPlayer {
    pub fn new(name: impl Into<String>, color: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            avatar: avatar.into(),
        }
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based position.
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub color: String,
    pub avatar: String,
    pub balance: u64,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {}",
            self.rank,
            self.avatar,
            self.name,
            format_money(self.balance)
        )
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Receive,
    Pay,
    Transfer,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Receive => write!(f, "receive"),
            EntryKind::Pay => write!(f, "pay"),
            EntryKind::Transfer => write!(f, "transfer"),
        }
    }
}

/// A recorded money movement. Never modified after it is pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: EntryKind,
    pub from_id: String,
    pub to_id: String,
    pub amount: u64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.description
        )
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything that is persisted between runs.
///
/// Fields missing from a stored document fall back to the bank-only
/// default, which is how partial saves get merged on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Bank first, then seats in table order.
    #[serde(deserialize_with = "skip_unreadable_players")]
    pub players: Vec<Player>,
    pub active_player_id: String,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
    pub started: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            players: vec![Player::bank()],
            active_player_id: BANK_ID.to_string(),
            history: Vec::new(),
            started: false,
        }
    }
}

/// Reads the roster entry by entry. An entry that does not parse is dropped
/// on its own, so a damaged bank record does not take the seats with it.
fn skip_unreadable_players<'de, D>(deserializer: D) -> Result<Vec<Player>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Player>(entry) {
            Ok(player) => Some(player),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable player entry");
                None
            }
        })
        .collect())
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seats = self.players.iter().filter(|p| !p.is_bank()).count();
        write!(
            f,
            "started={} | players={} | active={} | history={}",
            self.started,
            seats,
            self.active_player_id,
            self.history.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a money movement is refused. The ledger is left untouched in
/// every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid player: {0}")]
    InvalidPlayer(String),

    #[error("Source and destination must be different")]
    SameParty,

    #[error("Insufficient funds: {player} has ${available}, needs ${needed}")]
    InsufficientFunds {
        player: String,
        needed: u64,
        available: u64,
    },

    #[error("Transfer could not be completed: {0}")]
    TransferFailed(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
