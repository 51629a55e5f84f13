//! Table scenarios and ledger properties.
//!
//! Drives the ledger and engine the way the console does, with a pinned
//! clock and deterministic ids.

use banker::clock::FixedClock;
use banker::engine::TransactionEngine;
use banker::ids::SequentialIds;
use banker::ledger::Ledger;
use banker::types::*;

struct Table {
    ledger: Ledger,
    engine: TransactionEngine,
}

impl Table {
    /// Players get ids `<slug>-<n>` in seating order.
    fn new(names: &[&str], starting_balance: u64) -> Self {
        let mut ledger = Ledger::with_ids(Box::new(SequentialIds::new()));
        ledger.set_game(
            names.iter().map(|n| NewPlayer::new(*n, "#ffffff", "🐼")).collect(),
            starting_balance,
        );
        let engine = TransactionEngine::with_clock(Box::new(
            FixedClock::at("2026-02-14T18:30:00Z").unwrap(),
        ));
        Self { ledger, engine }
    }

    fn balance(&self, id: &str) -> u64 {
        self.ledger.get_player_by_id(id).unwrap().balance().unwrap()
    }

    fn total(&self) -> u64 {
        self.ledger.list_players(false).iter().filter_map(|p| p.balance()).sum()
    }
}

#[test]
fn test_game_setup_from_bank_only_state() {
    let table = Table::new(&["A", "B"], 1500);

    assert!(table.ledger.is_started());
    assert_eq!(table.balance("a-1"), 1500);
    assert_eq!(table.balance("b-2"), 1500);
    assert!(table.ledger.history().is_empty());
    assert_eq!(table.ledger.list_players(true).iter().filter(|p| p.is_bank()).count(), 1);
}

#[test]
fn test_pay_then_overdrawn_transfer_then_exact_transfer() {
    let mut table = Table::new(&["A", "B"], 1500);

    let pay = table.engine.pay_to_bank(&mut table.ledger, "a-1", 500.0).unwrap();
    assert_eq!(table.balance("a-1"), 1000);
    assert_eq!(pay.kind, EntryKind::Pay);
    assert_eq!(pay.amount, 500);
    assert_eq!(table.ledger.history().len(), 1);

    let err = table
        .engine
        .transfer_between_players(&mut table.ledger, "a-1", "b-2", 1200.0)
        .unwrap_err();
    assert!(matches!(err, BankerError::InsufficientFunds { .. }));
    assert_eq!(table.balance("a-1"), 1000);
    assert_eq!(table.balance("b-2"), 1500);
    assert_eq!(table.ledger.history().len(), 1);

    table
        .engine
        .transfer_between_players(&mut table.ledger, "a-1", "b-2", 1000.0)
        .unwrap();
    assert_eq!(table.balance("a-1"), 0);
    assert_eq!(table.balance("b-2"), 2500);
    assert_eq!(table.ledger.history().len(), 2);
    assert_eq!(table.ledger.history()[0].kind, EntryKind::Transfer);
}

#[test]
fn test_transfers_between_players_conserve_money() {
    let mut table = Table::new(&["A", "B", "C"], 1000);
    let moves = [
        ("a-1", "b-2", 300.0),
        ("b-2", "c-3", 1250.5),
        ("c-3", "a-1", 75.0),
        ("a-1", "c-3", 5000.0),
        ("b-2", "b-2", 1.0),
        ("c-3", "b-2", 0.0),
    ];

    for (from, to, amount) in moves {
        let _ = table
            .engine
            .transfer_between_players(&mut table.ledger, from, to, amount);
        assert_eq!(table.total(), 3000);
    }
    assert_eq!(table.ledger.history().len(), 3);
}

#[test]
fn test_balances_track_every_accepted_operation() {
    let mut table = Table::new(&["A", "B"], 100);
    let ids = ["a-1", "b-2"];
    let mut expected: [i64; 2] = [100, 100];
    let mut accepted = 0;

    // A fixed pseudo-random walk over every operation.
    let mut seed: u64 = 0x2545_f491;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let who = (seed >> 33) as usize % 2;
        let other = (seed >> 34) as usize % 2;
        let amount = ((seed >> 40) % 250) as i64 - 20;

        let (result, should_pass) = match (seed >> 50) % 3 {
            0 => {
                let ok = amount > 0;
                if ok {
                    expected[who] += amount;
                }
                let r = table.engine.receive_from_bank(&mut table.ledger, ids[who], amount as f64);
                (r, ok)
            }
            1 => {
                let ok = amount > 0 && expected[who] >= amount;
                if ok {
                    expected[who] -= amount;
                }
                let r = table.engine.pay_to_bank(&mut table.ledger, ids[who], amount as f64);
                (r, ok)
            }
            _ => {
                let ok = amount > 0 && who != other && expected[who] >= amount;
                if ok {
                    expected[who] -= amount;
                    expected[other] += amount;
                }
                let r = table.engine.transfer_between_players(
                    &mut table.ledger,
                    ids[who],
                    ids[other],
                    amount as f64,
                );
                (r, ok)
            }
        };

        assert_eq!(result.is_ok(), should_pass, "{result:?}");
        if should_pass {
            accepted += 1;
        }
        for (i, id) in ids.iter().enumerate() {
            assert!(expected[i] >= 0);
            assert_eq!(table.balance(id) as i64, expected[i]);
        }
    }

    assert!(accepted > 0);
    assert_eq!(table.ledger.history().len(), accepted.min(HISTORY_LIMIT));
    assert!(table.ledger.history().iter().all(|e| e.amount > 0));
}

#[test]
fn test_history_keeps_newest_two_hundred() {
    let mut table = Table::new(&["A", "B"], 1500);
    for _ in 0..201 {
        table.engine.receive_from_bank(&mut table.ledger, "a-1", 1.0).unwrap();
    }

    assert_eq!(table.ledger.history().len(), HISTORY_LIMIT);
    assert_eq!(table.balance("a-1"), 1701);
    assert!(table
        .ledger
        .history()
        .iter()
        .all(|e| e.kind == EntryKind::Receive && e.timestamp.to_rfc3339() == "2026-02-14T18:30:00+00:00"));
}

#[test]
fn test_leaderboard_tracks_balances() {
    let mut table = Table::new(&["A", "B", "C"], 1000);
    table.engine.receive_from_bank(&mut table.ledger, "c-3", 10.0).unwrap();
    table.engine.pay_to_bank(&mut table.ledger, "a-1", 10.0).unwrap();

    let ranking: Vec<_> = table.ledger.standings().into_iter().map(|s| s.id).collect();
    assert_eq!(ranking, vec!["c-3", "b-2", "a-1"]);
}
