//! Wall-clock access and elapsed-time arithmetic.
//!
//! The engine itself never reads the clock: every operation receives
//! `now` explicitly. Hosts pick a `Clock` implementation and pass its
//! reading in.

use crate::types::Timestamp;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Reads the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }
}

/// A hand-driven clock for tests and headless runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: Cell::new(start) }
    }

    pub fn set(&self, ts: Timestamp) {
        self.now.set(ts);
    }

    /// Move forward by `ms` and return the new reading.
    pub fn advance_ms(&self, ms: i64) -> Timestamp {
        let next = self.now.get().saturating_add(ms.max(0));
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.get()
    }
}

/// Seconds elapsed from `last` to `now`, clamped to `[0, max_secs]`.
/// A clock that moved backwards yields zero.
pub fn elapsed_secs(last: Timestamp, now: Timestamp, max_secs: f64) -> f64 {
    let raw = now.saturating_sub(last) as f64 / 1000.0;
    raw.clamp(0.0, max_secs.max(0.0))
}

/// Calendar day containing `ts`.
///
/// `utc_offset_minutes = None` uses the system's local time zone;
/// `Some(m)` pins the day boundary to a fixed offset (tests, servers).
pub fn day_key(ts: Timestamp, utc_offset_minutes: Option<i32>) -> NaiveDate {
    let utc = DateTime::<Utc>::from_timestamp_millis(ts).unwrap_or_default();
    match utc_offset_minutes.and_then(|m| FixedOffset::east_opt(m.saturating_mul(60))) {
        Some(offset) => utc.with_timezone(&offset).date_naive(),
        None => utc.with_timezone(&Local).date_naive(),
    }
}
