// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily aggregation service.
//!
//! Turns the live step count into today's `DailyRecord`, merges it into the
//! history by date key and persists the whole collection in one write.

use crate::db::{LocalDb, StoreError};
use crate::models::{DailyRecord, History};

/// Merge today's record for `steps` into a copy of `history`.
///
/// An existing record for `today_key` is replaced in place; otherwise the
/// new record is appended. All other records are left untouched.
pub fn recompute(history: &History, today_key: &str, steps: u32) -> History {
    let mut updated = history.clone();
    updated.upsert(DailyRecord::from_steps(today_key, steps));
    updated
}

/// Applies `recompute` to the in-memory history and persists the result.
#[derive(Clone)]
pub struct DailyAggregator {
    db: LocalDb,
}

impl DailyAggregator {
    pub fn new(db: LocalDb) -> Self {
        Self { db }
    }

    /// Recompute today's record and write the full history.
    ///
    /// The in-memory history is only replaced once the write succeeded, so
    /// memory never runs ahead of what is stored.
    pub fn apply(
        &self,
        history: &mut History,
        today_key: &str,
        steps: u32,
    ) -> Result<(), StoreError> {
        let updated = recompute(history, today_key, steps);
        self.db.set_history(&updated)?;
        *history = updated;

        tracing::trace!(date = today_key, steps, "Daily record persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{keys, MemoryStore};
    use std::sync::Arc;

    fn sample_history() -> History {
        History::from_records(vec![
            DailyRecord::from_steps("2024-01-13", 8_000),
            DailyRecord::from_steps("2024-01-14", 12_000),
            DailyRecord::from_steps("2024-01-15", 500),
        ])
    }

    #[test]
    fn test_recompute_appends_new_day() {
        let before = sample_history();
        let after = recompute(&before, "2024-01-16", 42);

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after.records()[..3], before.records());
        assert_eq!(after.records()[3], DailyRecord::from_steps("2024-01-16", 42));
    }

    #[test]
    fn test_recompute_replaces_existing_day_in_place() {
        let before = sample_history();
        let after = recompute(&before, "2024-01-14", 12_345);

        assert_eq!(after.len(), 3);
        assert_eq!(after.records()[0], before.records()[0]);
        assert_eq!(after.records()[1].steps, 12_345);
        assert_eq!(after.records()[1].calories, 494);
        assert_eq!(after.records()[2], before.records()[2]);
    }

    #[test]
    fn test_recompute_on_empty_history() {
        let after = recompute(&History::new(), "2024-01-15", 0);
        assert_eq!(after.records(), [DailyRecord::from_steps("2024-01-15", 0)]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let aggregator = DailyAggregator::new(LocalDb::new(store.clone()));
        let mut history = sample_history();

        aggregator.apply(&mut history, "2024-01-15", 777).unwrap();
        let first = store.raw(keys::HISTORY).unwrap();
        aggregator.apply(&mut history, "2024-01-15", 777).unwrap();
        let second = store.raw(keys::HISTORY).unwrap();

        assert_eq!(first, second);
        assert_eq!(history.len(), 3);
        assert_eq!(store.write_count(), 2);
    }
}
