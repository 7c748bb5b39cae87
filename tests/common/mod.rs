// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;
use zenstep::config::Config;
use zenstep::db::{KeyValueStore, LocalDb, MemoryStore};
use zenstep::routes::create_router;
use zenstep::services::{CoachService, Tracker};
use zenstep::time_utils::ManualClock;
use zenstep::AppState;

/// Fixed "today" used by the test apps.
#[allow(dead_code)]
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

/// Handles a test keeps alongside the router.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

/// Create a test app on an in-memory store, already bootstrapped.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(MemoryStore::new(), true)
}

/// Create a test app on the given store. With `bootstrap == false` the
/// load gate stays closed.
#[allow(dead_code)]
pub fn create_test_app_with(store: MemoryStore, bootstrap: bool) -> TestApp {
    let store = Arc::new(store);
    let clock = Arc::new(ManualClock::new(test_today()));
    let db = LocalDb::new(store.clone() as Arc<dyn KeyValueStore>);

    let tracker = if bootstrap {
        Tracker::bootstrap(db, clock.clone())
    } else {
        Tracker::new(db, clock.clone())
    };

    let state = Arc::new(AppState {
        config: Config::default(),
        tracker: Mutex::new(tracker),
        coach: CoachService::disabled(),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        clock,
    }
}

/// Send a request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// A batch of samples alternating between a spike and rest, spaced so that
/// every spike is a step.
#[allow(dead_code)]
pub fn walking_batch(steps: usize, start_ms: u64) -> serde_json::Value {
    let samples: Vec<serde_json::Value> = (0..steps)
        .flat_map(|i| {
            let t = start_ms + (i as u64) * 400;
            [
                serde_json::json!({ "x": 0.0, "y": 13.0, "z": 0.0, "timestampMs": t }),
                serde_json::json!({ "x": 0.0, "y": 9.8, "z": 0.0, "timestampMs": t + 200 }),
            ]
        })
        .collect();
    serde_json::json!({ "samples": samples })
}
