// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod daily;
pub mod profile;
pub mod stats;

pub use daily::{DailyRecord, DerivedMetrics, History};
pub use profile::{Theme, UserProfile};
pub use stats::{HistorySummary, WeekSummary, YearSummary};
