//! Application configuration loaded from environment variables.
//!
//! Everything has a sensible default except the Gemini API key, which is
//! optional: without it the coaching endpoint reports an error and the rest
//! of the app works normally.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted key-value files
    pub data_dir: PathBuf,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Gemini API key (coaching is disabled when absent)
    pub gemini_api_key: Option<String>,
    /// Gemini model used for coaching
    pub gemini_model: String,
    /// Base delay for coaching retries (doubled per attempt)
    pub coach_retry_base: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            coach_retry_base: Duration::from_millis(1),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let coach_retry_ms = match env::var("COACH_RETRY_BASE_MS") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("COACH_RETRY_BASE_MS", v))?,
            Err(_) => 1000,
        };

        Ok(Self {
            data_dir: env::var("ZENSTEP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            coach_retry_base: Duration::from_millis(coach_retry_ms),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
