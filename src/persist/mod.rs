/// In-process map implementation.
pub mod memory;
/// SQLite implementation.
pub mod sqlite;

use serde::{Serialize, de::DeserializeOwned};

/// Failure reading or writing the key-value store.
#[derive(Debug)]
pub enum PersistError {
    /// SQLite driver error.
    Sqlite(rusqlite::Error),
    /// Stored value failed to encode or decode.
    Serde(serde_json::Error),
    /// Any other backend failure.
    Message(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Result alias for store operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Synchronous string-keyed store holding JSON text values.
pub trait KvStore: Send {
    /// Reads the raw value under `key`.
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    /// Overwrites the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
    /// Deletes `key`; missing keys are not an error.
    fn remove(&mut self, key: &str) -> PersistResult<()>;
}

/// Decodes the JSON value under `key`, if present.
pub fn load_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> PersistResult<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and writes it under `key`.
pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn KvStore, key: &str, value: &T) -> PersistResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
