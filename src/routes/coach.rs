// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI coaching route.

use crate::error::Result;
use crate::services::coach::COACHING_WINDOW_DAYS;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/coach", post(get_advice))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdviceResponse {
    pub advice: String,
}

/// Generate advice from a snapshot of recent history.
///
/// The tracker lock is released before the (slow, retried) model call so
/// step ingestion is never blocked by coaching.
async fn get_advice(State(state): State<Arc<AppState>>) -> Result<Json<AdviceResponse>> {
    let (recent, profile) = {
        let tracker = state.tracker.lock().await;
        tracker.ensure_ready()?;
        (
            tracker.history().recent(COACHING_WINDOW_DAYS).to_vec(),
            tracker.profile().clone(),
        )
    };

    let advice = state.coach.advice(&recent, &profile).await?;
    Ok(Json(AdviceResponse { advice }))
}
