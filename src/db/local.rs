// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed access to the four persisted records.
//!
//! Provides high-level operations for:
//! - History (daily records, JSON array)
//! - Profile (JSON object)
//! - Theme (bare `dark`/`light` literal)
//! - Tracking intent (bare `true`/`false` literal)

use crate::db::{keys, KeyValueStore, MemoryStore, StoreError};
use crate::models::{DailyRecord, History, Theme, UserProfile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Typed database handle over a key-value store.
#[derive(Clone)]
pub struct LocalDb {
    store: Arc<dyn KeyValueStore>,
}

impl LocalDb {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Create a database backed by a fresh in-memory store.
    pub fn new_in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    // ─── History ─────────────────────────────────────────────────

    pub fn get_history(&self) -> Result<Option<History>, StoreError> {
        let records: Option<Vec<DailyRecord>> = self.get_json(keys::HISTORY)?;
        Ok(records.map(History::from_records))
    }

    /// Overwrite the whole history collection.
    pub fn set_history(&self, history: &History) -> Result<(), StoreError> {
        self.set_json(keys::HISTORY, history)
    }

    // ─── Profile ─────────────────────────────────────────────────

    pub fn get_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        self.get_json(keys::PROFILE)
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.set_json(keys::PROFILE, profile)
    }

    // ─── Theme ───────────────────────────────────────────────────

    pub fn get_theme(&self) -> Result<Option<Theme>, StoreError> {
        self.get_literal(keys::THEME, |raw| raw.parse::<Theme>().ok())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.store.save(keys::THEME, theme.as_str())
    }

    // ─── Tracking intent ─────────────────────────────────────────

    pub fn get_tracking_intent(&self) -> Result<Option<bool>, StoreError> {
        self.get_literal(keys::TRACKING_INTENT, |raw| match raw {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
    }

    pub fn set_tracking_intent(&self, enabled: bool) -> Result<(), StoreError> {
        self.store
            .save(keys::TRACKING_INTENT, if enabled { "true" } else { "false" })
    }

    // ─── Helpers ─────────────────────────────────────────────────

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.load(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Decode {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.save(key, &raw)
    }

    fn get_literal<T>(
        &self,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.load(key)? else {
            return Ok(None);
        };
        parse(raw.trim()).map(Some).ok_or_else(|| StoreError::Decode {
            key: key.to_string(),
            message: format!("unexpected literal {:?}", raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with(key: &str, value: &str) -> LocalDb {
        LocalDb::new(Arc::new(MemoryStore::new().with_value(key, value)))
    }

    #[test]
    fn test_missing_values_are_none() {
        let db = LocalDb::new_in_memory();
        assert!(db.get_history().unwrap().is_none());
        assert!(db.get_profile().unwrap().is_none());
        assert!(db.get_theme().unwrap().is_none());
        assert!(db.get_tracking_intent().unwrap().is_none());
    }

    #[test]
    fn test_history_is_stored_as_json_array() {
        let store = Arc::new(MemoryStore::new());
        let db = LocalDb::new(store.clone());

        let mut history = History::new();
        history.upsert(DailyRecord::from_steps("2024-01-15", 100));
        db.set_history(&history).unwrap();

        let raw = store.raw(keys::HISTORY).unwrap();
        assert_eq!(
            raw,
            r#"[{"date":"2024-01-15","steps":100,"distance":0.07,"calories":4,"activeTime":1}]"#
        );
        assert_eq!(db.get_history().unwrap(), Some(history));
    }

    #[test]
    fn test_literals_are_stored_bare() {
        let store = Arc::new(MemoryStore::new());
        let db = LocalDb::new(store.clone());

        db.set_theme(Theme::Dark).unwrap();
        db.set_tracking_intent(true).unwrap();

        assert_eq!(store.raw(keys::THEME).as_deref(), Some("dark"));
        assert_eq!(store.raw(keys::TRACKING_INTENT).as_deref(), Some("true"));
        assert_eq!(db.get_theme().unwrap(), Some(Theme::Dark));
        assert_eq!(db.get_tracking_intent().unwrap(), Some(true));
    }

    #[test]
    fn test_corrupt_history_is_decode_error() {
        let db = db_with(keys::HISTORY, "[{\"date\": ");
        let err = db.get_history().unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_unknown_theme_is_decode_error() {
        let db = db_with(keys::THEME, "sepia");
        assert!(db.get_theme().unwrap_err().is_decode());
    }

    #[test]
    fn test_profile_wrong_shape_is_decode_error() {
        let db = db_with(keys::PROFILE, r#"{"name": "A", "goal": "lots"}"#);
        assert!(db.get_profile().unwrap_err().is_decode());
    }
}
