//! Plain-text views of the ledger.

use std::fmt::Write;

use crate::ledger::roster::avatar_for;
use crate::ledger::Ledger;
use crate::types::{EntryKind, HistoryEntry, Standing};

/// Every player, bank first, with the active one marked.
pub fn players(ledger: &Ledger) -> String {
    let mut out = String::new();
    for player in ledger.list_players(true) {
        let marker = if player.id == ledger.active_player_id() { "▶" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {} {:<16} {:>12}  ({})",
            avatar_for(player),
            player.name,
            player.account.to_string(),
            player.id,
        );
    }
    out.trim_end().to_string()
}

/// The `count` newest entries.
pub fn history(entries: &[HistoryEntry], count: usize) -> String {
    if entries.is_empty() {
        return "No transactions yet.".to_string();
    }
    entries
        .iter()
        .take(count)
        .map(|e| format!("{} {e}", icon(e.kind)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn leaderboard(standings: &[Standing]) -> String {
    if standings.is_empty() {
        return "Nobody is seated yet.".to_string();
    }
    standings
        .iter()
        .map(|s| {
            let crown = if s.rank == 1 { "👑" } else { "  " };
            format!("{crown} {s}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line confirmation of a recorded transaction.
pub fn entry(entry: &HistoryEntry) -> String {
    format!("{} {}", icon(entry.kind), entry.description)
}

fn icon(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Receive => "🟢",
        EntryKind::Pay => "🔴",
        EntryKind::Transfer => "🔁",
    }
}
