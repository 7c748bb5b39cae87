// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read views, profile and theme routes.

use crate::error::{AppError, Result};
use crate::models::{HistorySummary, Theme, UserProfile, WeekSummary, YearSummary};
use crate::services::DashboardView;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Furthest a week view may be paged from the current week.
const MAX_WEEK_OFFSET: i32 = 520;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/history", get(get_history))
        .route("/api/calendar/week", get(get_week))
        .route("/api/calendar/year", get(get_year))
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/theme", get(get_theme).put(put_theme))
        .route("/api/theme/toggle", post(toggle_theme))
}

// ─── Views ───────────────────────────────────────────────────

/// Dashboard for today. Reports `loading` instead of failing while the
/// persisted state has not been read yet.
async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let tracker = state.tracker.lock().await;
    Json(tracker.dashboard())
}

async fn get_history(State(state): State<Arc<AppState>>) -> Result<Json<HistorySummary>> {
    let tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    Ok(Json(tracker.history_summary()))
}

#[derive(Debug, Deserialize)]
struct WeekParams {
    #[serde(default)]
    offset: i32,
}

async fn get_week(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeekParams>,
) -> Result<Json<WeekSummary>> {
    if !(-MAX_WEEK_OFFSET..=MAX_WEEK_OFFSET).contains(&params.offset) {
        return Err(AppError::BadRequest(format!(
            "offset must be within ±{}",
            MAX_WEEK_OFFSET
        )));
    }
    let tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    Ok(Json(tracker.week(params.offset)))
}

#[derive(Debug, Deserialize)]
struct YearParams {
    year: Option<i32>,
}

async fn get_year(
    State(state): State<Arc<AppState>>,
    Query(params): Query<YearParams>,
) -> Result<Json<YearSummary>> {
    let tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    let year = params.year.unwrap_or_else(|| tracker.today().year());
    if !(1970..=9999).contains(&year) {
        return Err(AppError::BadRequest(format!("invalid year {}", year)));
    }
    Ok(Json(tracker.year(year)))
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<UserProfile>> {
    let tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    Ok(Json(tracker.profile().clone()))
}

/// Replace the whole profile.
async fn put_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UserProfile>> {
    let mut tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    tracker.update_profile(profile)?;
    tracing::info!(goal = tracker.profile().goal, "Profile updated");
    Ok(Json(tracker.profile().clone()))
}

// ─── Theme ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ThemeBody {
    pub theme: Theme,
}

async fn get_theme(State(state): State<Arc<AppState>>) -> Result<Json<ThemeBody>> {
    let tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    Ok(Json(ThemeBody {
        theme: tracker.theme(),
    }))
}

async fn put_theme(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>> {
    let mut tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    let theme = tracker.set_theme(body.theme)?;
    Ok(Json(ThemeBody { theme }))
}

async fn toggle_theme(State(state): State<Arc<AppState>>) -> Result<Json<ThemeBody>> {
    let mut tracker = state.tracker.lock().await;
    tracker.ensure_ready()?;
    let theme = tracker.toggle_theme()?;
    Ok(Json(ThemeBody { theme }))
}
