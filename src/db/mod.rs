//! Persistence layer: a synchronous key-value store of whole JSON values.

pub mod local;
pub mod store;

pub use local::LocalDb;
pub use store::{FileStore, MemoryStore};

/// Storage keys as constants.
pub mod keys {
    /// Daily records (JSON array)
    pub const HISTORY: &str = "zenstep_data";
    /// User profile (JSON object)
    pub const PROFILE: &str = "zenstep_profile";
    /// Theme literal: `dark` or `light`
    pub const THEME: &str = "zenstep_theme";
    /// Tracking intent literal: `true` or `false`
    pub const TRACKING_INTENT: &str = "zenstep_tracking";
}

/// Device-local, durable key-value storage.
///
/// Values are overwritten whole; there are no field-level updates.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error for key {key}: {message}")]
    Io { key: String, message: String },

    #[error("Malformed value for key {key}: {message}")]
    Decode { key: String, message: String },

    #[error("Failed to encode value for key {key}: {message}")]
    Encode { key: String, message: String },
}

impl StoreError {
    /// True if the stored value exists but could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, StoreError::Decode { .. })
    }
}
