// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracking session and motion-sample routes.
//!
//! The browser owns the sensor: it shows the permission prompt, reports the
//! outcome to `/api/tracking/start`, then forwards batches of
//! `devicemotion` samples to `/api/motion` while tracking is active.

use crate::error::{AppError, Result};
use crate::services::{
    MotionSample, NoPermissionRequired, PermissionOutcome, ReportedPermission, SessionState,
};
use crate::AppState;
use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Upper bound on samples per request (~100s at 60Hz).
const MAX_SAMPLES_PER_BATCH: usize = 6000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tracking/start", post(start_tracking))
        .route("/api/tracking/stop", post(stop_tracking))
        .route("/api/motion", post(ingest_motion))
}

/// Session state response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrackingResponse {
    pub state: SessionState,
    /// False when the request did not change anything
    pub changed: bool,
}

/// Start request. `permission` is the result of the client's own prompt;
/// omit it on platforms that do not prompt.
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub permission: Option<PermissionOutcome>,
}

async fn start_tracking(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TrackingResponse>> {
    let request: StartRequest = if body.is_empty() {
        StartRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    let mut tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;

    let before = tracker.session_state();
    let after = match request.permission {
        Some(outcome) => {
            tracker
                .start_tracking(&ReportedPermission(outcome))
                .await?
        }
        None => tracker.start_tracking(&NoPermissionRequired).await?,
    };

    Ok(Json(TrackingResponse {
        state: after,
        changed: before != after,
    }))
}

async fn stop_tracking(State(state): State<Arc<AppState>>) -> Result<Json<TrackingResponse>> {
    let mut tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    let changed = tracker.stop_tracking();
    Ok(Json(TrackingResponse {
        state: tracker.session_state(),
        changed,
    }))
}

/// One `devicemotion` sample as sent by the client.
#[derive(Debug, Deserialize)]
pub struct MotionSampleBody {
    #[serde(flatten)]
    pub acceleration: MotionSample,
    /// Client delivery time in ms; the server clock is used when absent
    #[serde(rename = "timestampMs", alias = "timestamp_ms")]
    pub timestamp_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MotionBatch {
    pub samples: Vec<MotionSampleBody>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MotionResponse {
    /// Steps detected in this batch
    pub accepted: u32,
    /// Today's total after this batch
    pub steps: u32,
    pub tracking: SessionState,
}

/// Feed samples, in order, through the active session.
async fn ingest_motion(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<MotionBatch>,
) -> Result<Json<MotionResponse>> {
    if batch.samples.len() > MAX_SAMPLES_PER_BATCH {
        return Err(AppError::BadRequest(format!(
            "at most {} samples per request",
            MAX_SAMPLES_PER_BATCH
        )));
    }

    let mut tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;

    let mut accepted: u32 = 0;
    for sample in &batch.samples {
        let now_ms = sample.timestamp_ms.unwrap_or_else(|| tracker.now_ms());
        if tracker.handle_sample(&sample.acceleration, now_ms)? {
            accepted += 1;
        }
    }

    if accepted > 0 {
        tracing::debug!(accepted, steps = tracker.today_steps(), "Motion batch processed");
    }

    Ok(Json(MotionResponse {
        accepted,
        steps: tracker.today_steps(),
        tracking: tracker.session_state(),
    }))
}
