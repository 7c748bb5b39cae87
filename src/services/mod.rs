// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod coach;
pub mod detector;
pub mod session;
pub mod tracker;

pub use aggregator::DailyAggregator;
pub use coach::{CoachService, CoachingBackend, GeminiBackend};
pub use detector::{MotionSample, StepDetector};
pub use session::{
    MotionPermission, NoPermissionRequired, PermissionOutcome, ReportedPermission, SessionState,
    TrackingSession,
};
pub use tracker::{DashboardView, Tracker};
