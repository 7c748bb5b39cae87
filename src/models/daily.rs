// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily step record and the history collection.

use serde::{Deserialize, Serialize, Serializer};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kilometres per step.
pub const KM_PER_STEP: f64 = 0.0007;
/// Kilocalories per step.
pub const KCAL_PER_STEP: f64 = 0.04;
/// Steps per active minute.
pub const STEPS_PER_MINUTE: f64 = 100.0;

/// One calendar date's aggregated steps and derived metrics.
///
/// The derived fields are a pure function of `steps`; build records with
/// [`DailyRecord::from_steps`] so they can never drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Local date key (`YYYY-MM-DD`)
    pub date: String,
    pub steps: u32,
    /// Distance in km, rounded to 2 decimals
    pub distance: f64,
    /// Kilocalories
    pub calories: u32,
    /// Active minutes
    pub active_time: u32,
}

impl DailyRecord {
    /// Build the record for `date` with all metrics derived from `steps`.
    pub fn from_steps(date: impl Into<String>, steps: u32) -> Self {
        let metrics = DerivedMetrics::from_steps(steps);
        Self {
            date: date.into(),
            steps,
            distance: metrics.distance,
            calories: metrics.calories,
            active_time: metrics.active_time,
        }
    }
}

/// Distance, calories and active time for a step count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub distance: f64,
    pub calories: u32,
    pub active_time: u32,
}

impl DerivedMetrics {
    pub fn from_steps(steps: u32) -> Self {
        let steps = f64::from(steps);
        Self {
            distance: round_to_cents(steps * KM_PER_STEP),
            calories: (steps * KCAL_PER_STEP).round() as u32,
            active_time: (steps / STEPS_PER_MINUTE).round() as u32,
        }
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Daily records in insertion order, at most one per date.
///
/// Loading goes through [`History::from_records`], so stored metrics are
/// always re-derived from `steps`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<DailyRecord>")]
pub struct History(Vec<DailyRecord>);

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl From<Vec<DailyRecord>> for History {
    fn from(records: Vec<DailyRecord>) -> Self {
        Self::from_records(records)
    }
}

impl History {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap stored records, keeping only the first record for any date and
    /// recomputing derived metrics from the step count.
    pub fn from_records(records: Vec<DailyRecord>) -> Self {
        let mut history = Self(Vec::with_capacity(records.len()));
        for record in records {
            if history.find(&record.date).is_none() {
                let derived = DailyRecord::from_steps(record.date.as_str(), record.steps);
                if derived != record {
                    tracing::debug!(date = %record.date, "Re-derived stale metrics");
                }
                history.0.push(derived);
            } else {
                tracing::warn!(date = %record.date, "Dropping duplicate daily record");
            }
        }
        history
    }

    /// Record for a date key, if any.
    pub fn find(&self, date: &str) -> Option<&DailyRecord> {
        self.0.iter().find(|r| r.date == date)
    }

    /// Replace the record with the same date in place, or append it.
    pub fn upsert(&mut self, record: DailyRecord) {
        match self.0.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record,
            None => self.0.push(record),
        }
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.0
    }

    /// The last `n` records in insertion order.
    pub fn recent(&self, n: usize) -> &[DailyRecord] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_metrics_for_goal_day() {
        let record = DailyRecord::from_steps("2024-01-15", 10_000);
        assert_eq!(record.distance, 7.0);
        assert_eq!(record.calories, 400);
        assert_eq!(record.active_time, 100);
    }

    #[test]
    fn test_derived_metrics_rounding() {
        // 1234 * 0.0007 = 0.8638 -> 0.86, 1234 * 0.04 = 49.36 -> 49, 12.34 -> 12
        let m = DerivedMetrics::from_steps(1234);
        assert_eq!(m.distance, 0.86);
        assert_eq!(m.calories, 49);
        assert_eq!(m.active_time, 12);

        // Halves round up
        let m = DerivedMetrics::from_steps(50);
        assert_eq!(m.active_time, 1);
        assert_eq!(m.calories, 2);
    }

    #[test]
    fn test_zero_steps() {
        let record = DailyRecord::from_steps("2024-01-15", 0);
        assert_eq!(record.distance, 0.0);
        assert_eq!(record.calories, 0);
        assert_eq!(record.active_time, 0);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let record = DailyRecord::from_steps("2024-01-15", 100);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["activeTime"], 1);
        assert_eq!(json["date"], "2024-01-15");
        assert!(json.get("active_time").is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut history = History::from_records(vec![
            DailyRecord::from_steps("2024-01-01", 10),
            DailyRecord::from_steps("2024-01-02", 20),
            DailyRecord::from_steps("2024-01-03", 30),
        ]);

        history.upsert(DailyRecord::from_steps("2024-01-02", 99));

        let dates: Vec<&str> = history.records().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(history.find("2024-01-02").unwrap().steps, 99);
    }

    #[test]
    fn test_from_records_drops_duplicate_dates() {
        let history = History::from_records(vec![
            DailyRecord::from_steps("2024-01-01", 10),
            DailyRecord::from_steps("2024-01-01", 20),
        ]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.find("2024-01-01").unwrap().steps, 10);
    }

    #[test]
    fn test_loading_rederives_metrics() {
        let history: History = serde_json::from_str(
            r#"[{"date":"2024-01-15","steps":10000,"distance":1.0,"calories":5,"activeTime":0},
                {"date":"2024-01-15","steps":7,"distance":0.0,"calories":0,"activeTime":0}]"#,
        )
        .unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(
            history.records()[0],
            DailyRecord::from_steps("2024-01-15", 10_000)
        );
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let history = History::from_records(vec![DailyRecord::from_steps("2024-01-15", 100)]);
        assert_eq!(
            serde_json::to_string(&history).unwrap(),
            r#"[{"date":"2024-01-15","steps":100,"distance":0.07,"calories":4,"activeTime":1}]"#
        );
    }

    #[test]
    fn test_recent_returns_tail() {
        let history = History::from_records(
            (1..=9)
                .map(|d| DailyRecord::from_steps(format!("2024-01-0{}", d), d * 100))
                .collect(),
        );
        let recent = history.recent(7);
        assert_eq!(recent.len(), 7);
        assert_eq!(recent[0].date, "2024-01-03");
        assert_eq!(History::new().recent(7).len(), 0);
    }
}
