//! Transaction engine — receive, pay and transfer.
//!
//! Every operation either applies completely (balances updated and exactly
//! one history entry pushed) or fails with a [`BankerError`] and leaves the
//! ledger as it was.

pub mod amount;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::ledger::Ledger;
use crate::types::{format_money, BankerError, EntryKind, HistoryEntry, Player, BANK_ID};
use amount::normalize_amount;

/// Validates and applies money movements against a [`Ledger`].
#[derive(Debug)]
pub struct TransactionEngine {
    clock: Box<dyn Clock>,
}

impl Default for TransactionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionEngine {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self { clock }
    }

    /// The bank pays `amount` to a seated player.
    pub fn receive_from_bank(
        &self,
        ledger: &mut Ledger,
        to_id: &str,
        amount: f64,
    ) -> Result<HistoryEntry, BankerError> {
        let amount = normalize_amount(amount)?;
        let to = seat(ledger, to_id)?;

        if !ledger.update_balance(to_id, delta(amount)) {
            warn!(to = to_id, amount, "Credit from bank refused");
            return Err(BankerError::TransferFailed(format!(
                "{} cannot hold another {}",
                to.name,
                format_money(amount)
            )));
        }

        let entry = self.entry(
            EntryKind::Receive,
            BANK_ID,
            to_id,
            amount,
            format!("{} received {} from the Bank", to.name, format_money(amount)),
        );
        Ok(record(ledger, entry))
    }

    /// A seated player pays `amount` to the bank.
    pub fn pay_to_bank(
        &self,
        ledger: &mut Ledger,
        from_id: &str,
        amount: f64,
    ) -> Result<HistoryEntry, BankerError> {
        let amount = normalize_amount(amount)?;
        let from = seat(ledger, from_id)?;

        if !ledger.update_balance(from_id, -delta(amount)) {
            return Err(insufficient(&from, amount));
        }

        let entry = self.entry(
            EntryKind::Pay,
            from_id,
            BANK_ID,
            amount,
            format!("{} paid {} to the Bank", from.name, format_money(amount)),
        );
        Ok(record(ledger, entry))
    }

    /// Move `amount` from one player to another. Either side may be the
    /// bank, which is never debited or credited.
    ///
    /// The debit happens first. If the credit is then refused, the debit is
    /// reversed before failing with [`BankerError::TransferFailed`].
    pub fn transfer_between_players(
        &self,
        ledger: &mut Ledger,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> Result<HistoryEntry, BankerError> {
        let amount = normalize_amount(amount)?;
        if from_id == to_id {
            return Err(BankerError::SameParty);
        }

        let from = ledger
            .get_player_by_id(from_id)
            .cloned()
            .ok_or_else(|| BankerError::InvalidPlayer(from_id.to_string()))?;
        let to = ledger
            .get_player_by_id(to_id)
            .cloned()
            .ok_or_else(|| BankerError::InvalidPlayer(to_id.to_string()))?;

        let debited = from.is_bank() || ledger.update_balance(from_id, -delta(amount));
        if !debited {
            return Err(insufficient(&from, amount));
        }

        let credited = to.is_bank() || ledger.update_balance(to_id, delta(amount));
        if !credited {
            if !from.is_bank() && !ledger.update_balance(from_id, delta(amount)) {
                // Cannot happen: the source just held this amount.
                warn!(from = from_id, amount, "Compensation credit refused");
            }
            warn!(from = from_id, to = to_id, amount, "Transfer rolled back");
            return Err(BankerError::TransferFailed(format!(
                "{} could not receive {}",
                to.name,
                format_money(amount)
            )));
        }

        let entry = self.entry(
            EntryKind::Transfer,
            from_id,
            to_id,
            amount,
            format!("{} → {} {}", from.name, to.name, format_money(amount)),
        );
        Ok(record(ledger, entry))
    }

    fn entry(
        &self,
        kind: EntryKind,
        from_id: &str,
        to_id: &str,
        amount: u64,
        description: String,
    ) -> HistoryEntry {
        HistoryEntry {
            kind,
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            amount,
            description,
            timestamp: self.clock.now(),
        }
    }
}

/// Resolve a non-bank player.
fn seat(ledger: &Ledger, id: &str) -> Result<Player, BankerError> {
    match ledger.get_player_by_id(id) {
        Some(player) if !player.is_bank() => Ok(player.clone()),
        _ => Err(BankerError::InvalidPlayer(id.to_string())),
    }
}

fn insufficient(player: &Player, needed: u64) -> BankerError {
    let available = player.balance().unwrap_or_default();
    debug!(player = %player.id, needed, available, "Insufficient funds");
    BankerError::InsufficientFunds {
        player: player.name.clone(),
        needed,
        available,
    }
}

fn record(ledger: &mut Ledger, entry: HistoryEntry) -> HistoryEntry {
    info!(
        kind = %entry.kind,
        from = %entry.from_id,
        to = %entry.to_id,
        amount = entry.amount,
        "Transaction recorded"
    );
    ledger.push_history(entry.clone());
    entry
}

/// Amounts are bounded by `normalize_amount`, so this never truncates.
fn delta(amount: u64) -> i64 {
    amount as i64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
