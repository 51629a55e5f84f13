//! BANKER — table-side cash ledger for board games
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod clock;
pub mod config;
pub mod console;
pub mod dice;
pub mod engine;
pub mod ids;
pub mod ledger;
pub mod storage;
pub mod types;
