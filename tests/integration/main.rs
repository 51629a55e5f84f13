//! Integration tests: whole-session flows through the public API.

mod persistence;
mod scenarios;
