//! Save and restore through the persistence adapters.

use banker::clock::SystemClock;
use banker::engine::TransactionEngine;
use banker::ids::SequentialIds;
use banker::ledger::Ledger;
use banker::storage::{JsonFileStore, MemoryStore, StateRepository};
use banker::types::*;

fn played_ledger() -> Ledger {
    let mut ledger = Ledger::with_ids(Box::new(SequentialIds::new()));
    ledger.set_game(
        vec![NewPlayer::new("Ana", "#ef4444", "🦊"), NewPlayer::new("Bia", "#3b82f6", "🐯")],
        1500,
    );
    let engine = TransactionEngine::with_clock(Box::new(SystemClock));
    engine.transfer_between_players(&mut ledger, "ana-1", "bia-2", 200.0).unwrap();
    ledger.set_active_player("bia-2");
    ledger
}

#[test]
fn test_restore_resumes_the_game() {
    let store = MemoryStore::new();
    let original = played_ledger();
    store.save(original.state());

    let mut restored = Ledger::new();
    restored.replace_state(store.load().unwrap());

    assert_eq!(restored.state(), original.state());
    assert_eq!(restored.active_player_id(), "bia-2");
    assert_eq!(restored.history().len(), 1);
}

#[test]
fn test_file_store_round_trip() {
    let mut path = std::env::temp_dir();
    path.push(format!("banker_it_state_{}.json", uuid::Uuid::new_v4()));
    let store = JsonFileStore::new(&path);

    let original = played_ledger();
    store.save(original.state());
    let mut restored = Ledger::new();
    restored.replace_state(store.load().unwrap());
    assert_eq!(restored.state(), original.state());

    store.clear();
    assert!(!path.exists());
}

#[test]
fn test_corrupt_storage_falls_back_to_default() {
    let store = MemoryStore::with_raw("{\"players\": 42}");
    let mut ledger = Ledger::new();
    if let Some(saved) = store.load() {
        ledger.replace_state(saved);
    }

    assert!(!ledger.is_started());
    assert_eq!(*ledger.state(), SessionState::default());
}

#[test]
fn test_partial_storage_is_repaired() {
    let store = MemoryStore::with_raw(
        r##"{
            "players": [
                {"id": "ana-1", "name": "Ana", "color": "#ef4444",
                 "account": {"kind": "funds", "balance": 900}}
            ],
            "active_player_id": "someone-else",
            "started": true
        }"##,
    );

    let mut ledger = Ledger::new();
    ledger.replace_state(store.load().unwrap());

    let players = ledger.list_players(true);
    assert_eq!(*players[0], Player::bank());
    assert_eq!(players[1].balance(), Some(900));
    assert_eq!(ledger.active_player_id(), "ana-1");
    assert!(ledger.history().is_empty());

    let engine = TransactionEngine::new();
    engine.pay_to_bank(&mut ledger, "ana-1", 100.0).unwrap();
    assert_eq!(ledger.get_player_by_id("ana-1").unwrap().balance(), Some(800));
}

#[test]
fn test_damaged_bank_entry_is_canonicalised_on_restore() {
    let store = MemoryStore::with_raw(
        r##"{
            "players": [
                {"id": "bank", "name": "Bank"},
                {"id": "ana-1", "name": "Ana", "color": "#ef4444",
                 "account": {"kind": "funds", "balance": 900}},
                {"id": "bia-2", "name": "Bia", "color": "#3b82f6",
                 "account": {"kind": "funds", "balance": 2100}}
            ],
            "active_player_id": "bia-2",
            "started": true
        }"##,
    );

    let saved = store.load().unwrap();
    assert!(store.raw().is_some());

    let mut ledger = Ledger::new();
    ledger.replace_state(saved);

    let players = ledger.list_players(true);
    assert_eq!(*players[0], Player::bank());
    assert_eq!(players.len(), 3);
    assert_eq!(ledger.get_player_by_id("ana-1").unwrap().balance(), Some(900));
    assert_eq!(ledger.get_player_by_id("bia-2").unwrap().balance(), Some(2100));
    assert_eq!(ledger.active_player_id(), "bia-2");
    assert!(ledger.is_started());
}
