// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracking session state machine.
//!
//! Idle --start()--> PermissionPending --granted--> Active --stop()--> Idle
//!                                     --denied/error--> Idle
//!
//! The session owns the motion subscription: samples are only fed to the
//! step detector while `Active`, so after `stop()` returns no further step
//! can be produced. The persisted tracking flag records user intent only and
//! is never used to resume `Active` on startup.

use crate::db::LocalDb;
use crate::error::AppError;
use crate::services::detector::{MotionSample, StepDetector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lifecycle state of the motion subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    PermissionPending,
    Active,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::PermissionPending => "permission_pending",
            SessionState::Active => "active",
        };
        f.write_str(s)
    }
}

/// Result of a motion-sensor permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionOutcome {
    Granted,
    Denied,
    /// The request itself failed (no sensor, API error, ...)
    Unavailable,
}

/// Platform hook for acquiring motion-sensor access.
pub trait MotionPermission {
    /// Whether the platform requires an explicit runtime grant.
    fn requires_grant(&self) -> bool;

    /// Ask for access. This is the session's only suspension point.
    fn request(&self) -> impl Future<Output = PermissionOutcome> + Send;
}

/// Platform where motion events flow without any prompt.
pub struct NoPermissionRequired;

impl MotionPermission for NoPermissionRequired {
    fn requires_grant(&self) -> bool {
        false
    }

    async fn request(&self) -> PermissionOutcome {
        PermissionOutcome::Granted
    }
}

/// Outcome of a prompt the client already showed to the user.
pub struct ReportedPermission(pub PermissionOutcome);

impl MotionPermission for ReportedPermission {
    fn requires_grant(&self) -> bool {
        true
    }

    async fn request(&self) -> PermissionOutcome {
        self.0
    }
}

/// A motion tracking session with its persisted intent flag.
pub struct TrackingSession {
    state: SessionState,
    detector: StepDetector,
    db: LocalDb,
    /// Intent flag as last read or written; informational only
    intent: bool,
}

impl TrackingSession {
    /// Create an idle session. `persisted_intent` is kept for display only.
    pub fn new(db: LocalDb, persisted_intent: bool) -> Self {
        Self {
            state: SessionState::Idle,
            detector: StepDetector::new(),
            db,
            intent: persisted_intent,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Last known tracking intent (may be `true` while idle after a restart).
    pub fn intent(&self) -> bool {
        self.intent
    }

    /// Start tracking. A no-op unless the session is idle.
    pub async fn start<P: MotionPermission>(
        &mut self,
        permission: &P,
    ) -> Result<SessionState, AppError> {
        if self.state != SessionState::Idle {
            tracing::debug!(state = %self.state, "Start ignored, session not idle");
            return Ok(self.state);
        }

        if permission.requires_grant() {
            self.state = SessionState::PermissionPending;
            tracing::info!("Requesting motion sensor permission");

            match permission.request().await {
                PermissionOutcome::Granted => {}
                PermissionOutcome::Denied => {
                    tracing::warn!("Motion sensor permission denied");
                    self.fail_start();
                    return Err(AppError::PermissionDenied);
                }
                PermissionOutcome::Unavailable => {
                    tracing::warn!("Motion sensor permission request failed");
                    self.fail_start();
                    return Err(AppError::SensorUnavailable(
                        "permission request failed".to_string(),
                    ));
                }
            }
        }

        self.detector.reset();
        self.state = SessionState::Active;
        self.persist_intent(true);
        tracing::info!("Tracking started");
        Ok(self.state)
    }

    /// Stop tracking. Returns `false` (and writes nothing) if already idle.
    pub fn stop(&mut self) -> bool {
        if self.state == SessionState::Idle {
            return false;
        }

        self.state = SessionState::Idle;
        self.persist_intent(false);
        tracing::info!("Tracking stopped");
        true
    }

    /// Feed one sample to the detector. Returns `true` if it is a step.
    pub fn on_sample(&mut self, sample: &MotionSample, now_ms: u64) -> bool {
        if !self.is_active() {
            return false;
        }
        self.detector.process_sample(sample, now_ms)
    }

    fn fail_start(&mut self) {
        self.state = SessionState::Idle;
        self.persist_intent(false);
    }

    /// The flag is informational, so a failed write is logged, not raised.
    fn persist_intent(&mut self, enabled: bool) {
        self.intent = enabled;
        if let Err(e) = self.db.set_tracking_intent(enabled) {
            tracing::warn!(error = %e, enabled, "Failed to persist tracking intent");
        }
    }
}
