//! Clock abstraction for timestamp defaulting
//!
//! Readings arriving without a usable timestamp are stamped with "now" at
//! normalization time. That default is the only place the aggregator
//! touches wall-clock time, so it sits behind a trait: production uses the
//! system clock, tests pin or advance a fixed one deterministically.

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock at a given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Move the clock to a new instant.
    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    /// Advance the clock by whole milliseconds.
    pub fn advance_ms(&mut self, ms: i64) {
        self.now = self.now + chrono::Duration::milliseconds(ms);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
