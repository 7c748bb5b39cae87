// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date keys and the clock seam.

use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Format used for `DailyRecord::date` keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar date as a `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key back into a date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Source of the current local date and a monotonic millisecond clock.
pub trait Clock: Send + Sync {
    /// Current local calendar date.
    fn today(&self) -> NaiveDate;
    /// Monotonic milliseconds, used to timestamp motion samples.
    fn now_ms(&self) -> u64;
}

/// Wall-clock date plus a monotonic counter anchored at construction.
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and replays.
pub struct ManualClock {
    today: Mutex<NaiveDate>,
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
            now_ms: AtomicU64::new(0),
        }
    }

    pub fn set_today(&self, date: NaiveDate) {
        if let Ok(mut today) = self.today.lock() {
            *today = date;
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(today) => *today,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_key(date), "2024-03-07");
        assert_eq!(parse_date_key("2024-03-07"), Some(date));
    }

    #[test]
    fn test_parse_date_key_rejects_garbage() {
        assert_eq!(parse_date_key("07/03/2024"), None);
        assert_eq!(parse_date_key(""), None);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        clock.advance_ms(350);
        clock.advance_ms(50);
        assert_eq!(clock.now_ms(), 400);

        let next = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        clock.set_today(next);
        assert_eq!(clock.today(), next);
    }
}
