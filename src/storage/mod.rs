//! Persistence layer.
//!
//! Saves and loads the session state as JSON. The file name carries a
//! version tag (`-v1`); older shapes are not migrated, anything that fails
//! to parse is treated as absent and the ledger starts from its default.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::types::SessionState;

/// Default state file path.
pub const DEFAULT_STATE_FILE: &str = "banker-state-v1.json";

/// Durable home for the session state.
///
/// None of these calls fail from the caller's point of view: a failed save
/// is logged and dropped, and unreadable data loads as `None`.
#[cfg_attr(test, mockall::automock)]
pub trait StateRepository {
    fn save(&self, state: &SessionState);
    fn load(&self) -> Option<SessionState>;
    fn clear(&self);
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// State kept in a JSON file, written via a temp file and rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_save(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).context("Failed to serialise state")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move state into {}", self.path.display()))?;
        Ok(())
    }

    fn try_read(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(Some(bytes))
    }

    fn try_clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl StateRepository for JsonFileStore {
    fn save(&self, state: &SessionState) {
        match self.try_save(state) {
            Ok(()) => debug!(path = %self.path.display(), state = %state, "State saved"),
            Err(e) => error!(error = %format!("{e:#}"), "Failed to save state"),
        }
    }

    /// Only data that was read but does not parse is deleted. A failed read
    /// leaves the file in place.
    fn load(&self) -> Option<SessionState> {
        let bytes = match self.try_read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!(path = %self.path.display(), "No saved state found, starting fresh");
                return None;
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Failed to read saved state");
                return None;
            }
        };

        match serde_json::from_slice::<SessionState>(&bytes) {
            Ok(state) => {
                info!(path = %self.path.display(), state = %state, "State loaded from disk");
                Some(state)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable state");
                self.clear();
                None
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = self.try_clear() {
            error!(error = %format!("{e:#}"), "Failed to clear state");
        }
    }
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// Keeps the serialised JSON in memory. Same encoding as [`JsonFileStore`],
/// without touching the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw stored text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    /// The stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl StateRepository for MemoryStore {
    fn save(&self, state: &SessionState) {
        match serde_json::to_string(state) {
            Ok(json) => *self.raw.borrow_mut() = Some(json),
            Err(e) => error!(error = %e, "Failed to serialise state"),
        }
    }

    fn load(&self) -> Option<SessionState> {
        let raw = self.raw.borrow().clone()?;
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable state");
                self.clear();
                None
            }
        }
    }

    fn clear(&self) {
        *self.raw.borrow_mut() = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
