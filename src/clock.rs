//! Time source for history timestamps.

use chrono::{DateTime, Utc};
use std::fmt;

/// Supplies the current instant. Injected into the transaction engine so
/// tests can pin timestamps.
pub trait Clock: fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Parse an RFC 3339 timestamp, e.g. `2026-01-01T12:00:00Z`.
    pub fn at(rfc3339: &str) -> anyhow::Result<Self> {
        let instant = DateTime::parse_from_rfc3339(rfc3339)?.with_timezone(&Utc);
        Ok(Self(instant))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
