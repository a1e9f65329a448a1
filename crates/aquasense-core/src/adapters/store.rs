//! Client storage adapter trait.
//!
//! This module defines the `KeyValueStore` trait for the small key/value
//! storage that survives between views, allowing both a file-backed store
//! and an in-memory fake for tests.

use crate::error::Result;

/// Well-known storage keys.
pub mod keys {
    /// Serialized questionnaire answers.
    pub const QUESTIONNAIRE_DATA: &str = "questionnaireData";

    /// Serialized user record with an `id` field.
    pub const USER: &str = "user";

    /// Opaque authorization token.
    pub const TOKEN: &str = "token";

    /// Latest predicted daily usage.
    pub const PREDICTED_USAGE: &str = "predictedUsage";
}

/// Key/value client storage.
///
/// Values are plain strings. Reads and writes are not coordinated between
/// writers; the last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the key has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::StorageRead` or `AquaError::CorruptedStorage` if
    /// the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::StorageWrite` if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
