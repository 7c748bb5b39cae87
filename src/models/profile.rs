//! User profile and theme preference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Singleton user profile, overwritten wholesale on every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Daily step target
    #[validate(range(min = 1, max = 100_000))]
    pub goal: u32,
    /// Weight in kg
    #[validate(range(min = 1.0, max = 500.0))]
    pub weight: f64,
    /// Height in cm
    #[validate(range(min = 30.0, max = 300.0))]
    pub height: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Utilisateur".to_string(),
            goal: 10_000,
            weight: 70.0,
            height: 175.0,
        }
    }
}

/// Color theme preference, stored as the bare literal `dark` or `light`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme {:?}", other)),
        }
    }
}
