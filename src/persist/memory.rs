//! Ephemeral key-value store.

use hashbrown::HashMap;

use super::{KvStore, PersistResult};

/// [`KvStore`] backed by a hash map; contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
    writes: u64,
}

impl MemoryKvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`remove` calls applied so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Number of keys currently present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no keys are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        self.writes += 1;
        self.entries.remove(key);
        Ok(())
    }
}
