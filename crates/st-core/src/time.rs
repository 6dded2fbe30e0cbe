//! Wall-clock timestamps attached to every exported row.
//!
//! Rows are stamped with the wall-clock time at which they were collected,
//! not with simulated time.  The [`Clock`] trait exists so tests can stamp
//! rows deterministically with [`FixedClock`].

use std::cell::Cell;
use std::fmt;

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Output format for timestamps.  Lexicographic order matches time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// A local wall-clock instant with microsecond display precision.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub NaiveDateTime);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

// ── Clocks ────────────────────────────────────────────────────────────────────

/// Source of row timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The local system clock.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(Local::now().naive_local())
    }
}

/// Deterministic clock: returns `start`, then advances by `tick` on every
/// call.
#[derive(Clone, Debug)]
pub struct FixedClock {
    next: Cell<NaiveDateTime>,
    tick: TimeDelta,
}

impl FixedClock {
    pub fn new(start: NaiveDateTime, tick: TimeDelta) -> Self {
        Self { next: Cell::new(start), tick }
    }

    /// Starts at 2023-03-01 00:00:00 and advances one second per call.
    pub fn seconds() -> Self {
        let start = chrono::NaiveDate::from_ymd_opt(2023, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self::new(start, TimeDelta::seconds(1))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        let now = self.next.get();
        self.next.set(now + self.tick);
        Timestamp(now)
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
