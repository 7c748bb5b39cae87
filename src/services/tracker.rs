// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application state owner: startup load ordering, the live step counter
//! and the step-count event handler.
//!
//! Startup sequence:
//! 1. Read theme, profile, history and tracking intent (defaults if absent
//!    or malformed)
//! 2. Seed the step counter from today's record
//! 3. Create the tracking session in `Idle`
//! 4. Open the load gate; only now may step changes reach the aggregator

use crate::db::{LocalDb, StoreError};
use crate::error::{AppError, Result};
use crate::models::stats::progress_percent;
use crate::models::{
    DerivedMetrics, History, HistorySummary, Theme, UserProfile, WeekSummary, YearSummary,
};
use crate::services::aggregator::DailyAggregator;
use crate::services::detector::MotionSample;
use crate::services::session::{MotionPermission, SessionState, TrackingSession};
use crate::time_utils::{date_key, Clock};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Barrier between loading persisted state and aggregating new steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadGate {
    Closed,
    Open,
}

/// Live step count for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCounter {
    pub date: NaiveDate,
    pub steps: u32,
}

/// Snapshot backing the dashboard view.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// True until persisted state has been read
    pub loading: bool,
    pub date: String,
    pub steps: u32,
    pub goal: u32,
    pub progress_percent: f64,
    pub metrics: DerivedMetrics,
    pub tracking: SessionState,
    /// Tracking was on when the app last ran (informational)
    pub tracking_intent: bool,
    pub theme: Theme,
}

/// Single owner of all mutable app state.
pub struct Tracker {
    db: LocalDb,
    clock: Arc<dyn Clock>,
    aggregator: DailyAggregator,
    gate: LoadGate,
    history: History,
    profile: UserProfile,
    theme: Theme,
    counter: StepCounter,
    session: TrackingSession,
}

impl Tracker {
    /// Create a tracker with defaults and the load gate closed.
    pub fn new(db: LocalDb, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        Self {
            aggregator: DailyAggregator::new(db.clone()),
            session: TrackingSession::new(db.clone(), false),
            db,
            clock,
            gate: LoadGate::Closed,
            history: History::new(),
            profile: UserProfile::default(),
            theme: Theme::default(),
            counter: StepCounter {
                date: today,
                steps: 0,
            },
        }
    }

    /// Create a tracker, load persisted state and open the gate.
    pub fn bootstrap(db: LocalDb, clock: Arc<dyn Clock>) -> Self {
        let mut tracker = Self::new(db, clock);
        tracker.load_persisted();
        tracker.open_gate();
        tracker
    }

    /// Read all persisted records and seed the step counter.
    ///
    /// Never fails: missing or malformed values fall back to defaults.
    pub fn load_persisted(&mut self) {
        self.theme = or_default(self.db.get_theme(), "theme");
        self.profile = or_default(self.db.get_profile(), "profile");
        self.history = or_default(self.db.get_history(), "history");
        let intent = or_default(self.db.get_tracking_intent(), "tracking intent");

        let today = self.clock.today();
        self.counter = StepCounter {
            date: today,
            steps: self.recorded_steps(today),
        };
        self.session = TrackingSession::new(self.db.clone(), intent);

        tracing::info!(
            records = self.history.len(),
            seeded_steps = self.counter.steps,
            tracking_intent = intent,
            "Persisted state loaded"
        );
    }

    /// Allow step changes to be aggregated and persisted from now on.
    pub fn open_gate(&mut self) {
        self.gate = LoadGate::Open;
    }

    pub fn is_loading(&self) -> bool {
        self.gate == LoadGate::Closed
    }

    /// Error with `AppError::Loading` while the gate is closed.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.is_loading() {
            return Err(AppError::Loading);
        }
        Ok(())
    }

    // ─── Step counting ───────────────────────────────────────────

    /// Feed one motion sample through the session. Returns `true` on a step.
    pub fn handle_sample(&mut self, sample: &MotionSample, now_ms: u64) -> Result<bool> {
        if !self.session.on_sample(sample, now_ms) {
            return Ok(false);
        }
        self.increment_step()?;
        Ok(true)
    }

    /// Add one step to today's count and run the change handler.
    pub fn increment_step(&mut self) -> Result<()> {
        self.roll_over_if_needed();
        self.counter.steps = self.counter.steps.saturating_add(1);
        tracing::trace!(steps = self.counter.steps, "Step detected");
        self.on_step_count_changed()?;
        Ok(())
    }

    /// Recompute and persist today's record, unless still loading.
    fn on_step_count_changed(&mut self) -> std::result::Result<(), StoreError> {
        if self.gate == LoadGate::Closed {
            return Ok(());
        }
        let key = date_key(self.counter.date);
        self.aggregator
            .apply(&mut self.history, &key, self.counter.steps)
    }

    /// Start counting a new day when the local date has changed.
    fn roll_over_if_needed(&mut self) {
        let today = self.clock.today();
        if today == self.counter.date {
            return;
        }
        let steps = self.recorded_steps(today);
        tracing::info!(
            from = %self.counter.date,
            to = %today,
            seeded_steps = steps,
            "Date rolled over"
        );
        self.counter = StepCounter { date: today, steps };
    }

    fn recorded_steps(&self, date: NaiveDate) -> u32 {
        self.history
            .find(&date_key(date))
            .map_or(0, |record| record.steps)
    }

    /// Steps for today, accounting for a rollover that has not been applied yet.
    pub fn today_steps(&self) -> u32 {
        let today = self.clock.today();
        if today == self.counter.date {
            self.counter.steps
        } else {
            self.recorded_steps(today)
        }
    }

    pub fn counter(&self) -> StepCounter {
        self.counter
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // ─── Tracking session ────────────────────────────────────────

    pub async fn start_tracking<P: MotionPermission>(
        &mut self,
        permission: &P,
    ) -> Result<SessionState> {
        self.session.start(permission).await
    }

    pub fn stop_tracking(&mut self) -> bool {
        self.session.stop()
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    // ─── Profile & theme ─────────────────────────────────────────

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Validate and persist a whole new profile.
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<()> {
        profile
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.db.set_profile(&profile)?;
        self.profile = profile;
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme> {
        self.db.set_theme(theme)?;
        self.theme = theme;
        Ok(theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.set_theme(self.theme.toggled())
    }

    // ─── Views ───────────────────────────────────────────────────

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn dashboard(&self) -> DashboardView {
        let steps = self.today_steps();
        DashboardView {
            loading: self.is_loading(),
            date: date_key(self.clock.today()),
            steps,
            goal: self.profile.goal,
            progress_percent: progress_percent(steps, self.profile.goal),
            metrics: DerivedMetrics::from_steps(steps),
            tracking: self.session.state(),
            tracking_intent: self.session.intent(),
            theme: self.theme,
        }
    }

    pub fn history_summary(&self) -> HistorySummary {
        HistorySummary::from_history(&self.history)
    }

    pub fn week(&self, offset: i32) -> WeekSummary {
        WeekSummary::for_offset(&self.history, self.clock.today(), offset, self.profile.goal)
    }

    pub fn year(&self, year: i32) -> YearSummary {
        YearSummary::for_year(&self.history, year, self.profile.goal)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

/// Unwrap a load result, falling back to the default on absence or error.
fn or_default<T: Default>(loaded: std::result::Result<Option<T>, StoreError>, what: &str) -> T {
    match loaded {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(error = %e, what, "Ignoring unreadable stored value");
            T::default()
        }
    }
}
