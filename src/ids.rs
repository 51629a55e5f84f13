//! Player id generation.
//!
//! Ids are a slug of the player's name followed by a short random suffix,
//! so they stay readable in the state file and unique within a session.

use std::cell::Cell;
use std::fmt;
use uuid::Uuid;

/// Produces a fresh, session-unique id for a player.
pub trait IdGenerator: fmt::Debug {
    fn next_id(&self, name: &str) -> String;
}

/// `ana-1f3c9a2b` style ids backed by v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self, name: &str) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("{}-{}", slugify(name), &uuid[..8])
    }
}

/// `ana-1`, `bruno-2`, ... Deterministic, for tests and replays.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: Cell<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, name: &str) -> String {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        format!("{}-{next}", slugify(name))
    }
}

/// Lowercase, with every run of non `[a-z0-9]` characters collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "player".to_string()
    } else {
        slug
    }
}
