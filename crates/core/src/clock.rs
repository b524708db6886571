// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction and record stamping.
//!
//! Every queued mutation carries a unique id and an enqueue timestamp,
//! both issued by a [`Stamper`]. Stamps are monotonically non-decreasing
//! within a session: if the wall clock steps backwards, the last observed
//! millisecond is reused and a per-millisecond sequence counter keeps ids
//! unique.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

/// A stamp for a newly queued mutation: unique id plus enqueue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    /// Record id, unique within the stamper's lifetime.
    pub id: String,
    /// Enqueue timestamp, never earlier than any previous stamp.
    pub at: DateTime<Utc>,
}

/// Issues record stamps with monotonically non-decreasing timestamps.
///
/// Thread-safe; a wall clock that stays still or runs backwards is
/// absorbed by the sequence counter.
pub struct Stamper<C: ClockSource = SystemClock> {
    clock: C,
    last_ms: Mutex<u64>,
    seq: AtomicU32,
}

impl Stamper<SystemClock> {
    /// Creates a stamper backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Stamper<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> Stamper<C> {
    /// Creates a stamper with a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        Stamper { clock, last_ms: Mutex::new(0), seq: AtomicU32::new(0) }
    }

    /// Produces the next stamp.
    pub fn next(&self) -> Stamp {
        let physical = self.clock.now_ms();
        let mut last_ms = self.last_ms.lock().unwrap_or_else(|e| e.into_inner());

        let (wall_ms, seq) = if physical > *last_ms {
            // Normal case: wall clock advanced
            *last_ms = physical;
            self.seq.store(0, AtomicOrdering::SeqCst);
            (physical, 0)
        } else {
            // Clock went backwards or stayed same: increment sequence
            let seq = self.seq.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            (*last_ms, seq)
        };

        Stamp { id: format!("{wall_ms}-{seq}"), at: timestamp_ms(wall_ms) }
    }

    /// Current time from the underlying clock source.
    pub fn now(&self) -> DateTime<Utc> {
        timestamp_ms(self.clock.now_ms())
    }
}

fn timestamp_ms(ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
