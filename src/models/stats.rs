//! Read-only summaries over the step history for the dashboard, history
//! and calendar views.
//!
//! These are computed on demand from `History`; nothing here is persisted.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{DailyRecord, History};
use crate::time_utils::date_key;

/// Number of records shown in the history chart.
pub const HISTORY_CHART_DAYS: usize = 7;

/// Progress towards the daily goal in percent, capped at 100.
pub fn progress_percent(steps: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (f64::from(steps) * 100.0 / f64::from(goal)).min(100.0)
}

/// Aggregates for the history view.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Most recent records (chart data), oldest first
    pub recent: Vec<DailyRecord>,
    /// Mean steps per recorded day over the whole history
    pub average_steps: u32,
    /// Total distance over the whole history (km, one decimal)
    pub total_distance: f64,
    /// Number of recorded days
    pub days_recorded: usize,
}

impl HistorySummary {
    pub fn from_history(history: &History) -> Self {
        let records = history.records();
        let total_steps: u64 = records.iter().map(|r| u64::from(r.steps)).sum();
        let total_distance: f64 = records.iter().map(|r| r.distance).sum();

        Self {
            recent: history.recent(HISTORY_CHART_DAYS).to_vec(),
            average_steps: (total_steps as f64 / records.len().max(1) as f64).round() as u32,
            total_distance: (total_distance * 10.0).round() / 10.0,
            days_recorded: records.len(),
        }
    }
}

/// One day of the week view.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub date: String,
    pub steps: u32,
    pub progress_percent: f64,
    pub goal_met: bool,
    pub is_today: bool,
}

/// Monday-to-Sunday breakdown of a single week.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    /// Week offset relative to the current week (negative = past)
    pub offset: i32,
    pub days: Vec<WeekDay>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_steps: u64,
    /// Total divided by 7, missing days counting as zero
    pub average_steps: u32,
}

impl WeekSummary {
    /// Build the week containing `today + 7 * offset` days.
    pub fn for_offset(history: &History, today: NaiveDate, offset: i32, goal: u32) -> Self {
        let days_from_monday = i64::from(today.weekday().num_days_from_monday());
        let monday = today - Duration::days(days_from_monday) + Duration::weeks(i64::from(offset));
        let today_key = date_key(today);

        let days: Vec<WeekDay> = (0..7)
            .map(|i| {
                let date = date_key(monday + Duration::days(i));
                let steps = history.find(&date).map_or(0, |r| r.steps);
                WeekDay {
                    is_today: date == today_key,
                    progress_percent: progress_percent(steps, goal),
                    goal_met: steps >= goal,
                    steps,
                    date,
                }
            })
            .collect();

        let total_steps: u64 = days.iter().map(|d| u64::from(d.steps)).sum();

        Self {
            offset,
            average_steps: (total_steps as f64 / 7.0).round() as u32,
            total_steps,
            days,
        }
    }
}

/// Goal tally for one month of the year view.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// 1-based month number
    pub month: u32,
    /// Days in this month with `steps >= goal`
    pub goals_met: u32,
}

/// Whole-year overview backing the heatmap.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct YearSummary {
    pub year: i32,
    pub months: Vec<MonthSummary>,
    /// Steps per recorded date of this year
    pub days: BTreeMap<String, u32>,
}

impl YearSummary {
    pub fn for_year(history: &History, year: i32, goal: u32) -> Self {
        let mut months: Vec<MonthSummary> = (1..=12)
            .map(|month| MonthSummary {
                month,
                goals_met: 0,
            })
            .collect();
        let mut days = BTreeMap::new();

        for record in history.records() {
            let Some(date) = crate::time_utils::parse_date_key(&record.date) else {
                continue;
            };
            if date.year() != year {
                continue;
            }
            if record.steps >= goal {
                months[date.month0() as usize].goals_met += 1;
            }
            days.insert(record.date.clone(), record.steps);
        }

        Self { year, months, days }
    }
}
