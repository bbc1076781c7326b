//! In-memory key-value store for testing.

use crate::error::KvResult;
use crate::store::KvStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory key-value store.
///
/// This store keeps all entries in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence across restarts
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use entstore_storage::{KvStore, MemoryKv};
///
/// let kv = MemoryKv::new();
/// kv.write("greeting", "hello").unwrap();
/// assert_eq!(kv.read("greeting").unwrap().as_deref(), Some("hello"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries.
    ///
    /// Useful for testing hydration scenarios.
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Returns a copy of every entry in the store.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn entries(&self) -> HashMap<String, String> {
        self.entries.read().clone()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes every entry from the store.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl KvStore for MemoryKv {
    fn read(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> KvResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_absent_key() {
        let kv = MemoryKv::new();
        assert_eq!(kv.read("missing").unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let kv = MemoryKv::new();
        kv.write("a", "1").unwrap();
        assert_eq!(kv.read("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn write_replaces_previous_value() {
        let kv = MemoryKv::new();
        kv.write("a", "1").unwrap();
        kv.write("a", "2").unwrap();
        assert_eq!(kv.read("a").unwrap().as_deref(), Some("2"));
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn with_entries_prepopulates() {
        let kv = MemoryKv::with_entries([("k".to_string(), "v".to_string())]);
        assert_eq!(kv.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn clear_removes_everything() {
        let kv = MemoryKv::new();
        kv.write("a", "1").unwrap();
        kv.clear();
        assert!(kv.is_empty());
        assert_eq!(kv.read("a").unwrap(), None);
    }
}
