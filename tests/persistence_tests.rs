// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Restart behavior against the file-backed store.

use chrono::NaiveDate;
use std::sync::Arc;
use zenstep::db::{FileStore, KeyValueStore, LocalDb};
use zenstep::services::{NoPermissionRequired, SessionState, Tracker};
use zenstep::time_utils::ManualClock;

mod common;

fn open(dir: &std::path::Path, clock: Arc<ManualClock>) -> Tracker {
    let store = FileStore::open(dir).unwrap();
    Tracker::bootstrap(LocalDb::new(Arc::new(store)), clock)
}

#[tokio::test]
async fn test_restart_preserves_today_and_intent() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(common::test_today()));

    {
        let mut tracker = open(dir.path(), clock.clone());
        tracker.start_tracking(&NoPermissionRequired).await.unwrap();
        for _ in 0..42 {
            tracker.increment_step().unwrap();
        }
        tracker.toggle_theme().unwrap();
    }

    let tracker = open(dir.path(), clock);
    assert_eq!(tracker.today_steps(), 42);
    assert_eq!(tracker.theme().as_str(), "dark");
    // Intent is remembered but tracking never resumes by itself
    assert_eq!(tracker.session_state(), SessionState::Idle);
    assert!(tracker.dashboard().tracking_intent);
}

#[tokio::test]
async fn test_restart_continues_counting_from_persisted_value() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(common::test_today()));

    {
        let mut tracker = open(dir.path(), clock.clone());
        for _ in 0..10 {
            tracker.increment_step().unwrap();
        }
    }

    let mut tracker = open(dir.path(), clock);
    tracker.increment_step().unwrap();
    assert_eq!(tracker.today_steps(), 11);
    assert_eq!(tracker.history().len(), 1);
}

#[test]
fn test_corrupt_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("zenstep_data.json"), "not json").unwrap();
    std::fs::write(dir.path().join("zenstep_profile.json"), "{\"goal\":").unwrap();
    std::fs::write(dir.path().join("zenstep_theme.json"), "purple").unwrap();

    let clock = Arc::new(ManualClock::new(common::test_today()));
    let tracker = open(dir.path(), clock);

    assert!(!tracker.is_loading());
    assert_eq!(tracker.today_steps(), 0);
    assert!(tracker.history().is_empty());
    assert_eq!(tracker.profile().goal, 10000);
    assert_eq!(tracker.theme().as_str(), "light");
}

#[test]
fn test_records_for_other_days_survive_updates() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store
        .save(
            "zenstep_data",
            r#"[{"date":"2024-01-14","steps":3000,"distance":2.1,"calories":120,"activeTime":30}]"#,
        )
        .unwrap();

    let clock = Arc::new(ManualClock::new(common::test_today()));
    let mut tracker = open(dir.path(), clock.clone());
    tracker.increment_step().unwrap();

    let raw = store.load("zenstep_data").unwrap().unwrap();
    assert!(raw.contains("\"date\":\"2024-01-14\",\"steps\":3000"));
    assert!(raw.contains("\"date\":\"2024-01-15\",\"steps\":1"));

    // Next day starts from zero and leaves both earlier records alone
    clock.set_today(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
    tracker.increment_step().unwrap();
    assert_eq!(tracker.today_steps(), 1);
    assert_eq!(tracker.history().len(), 3);
}
