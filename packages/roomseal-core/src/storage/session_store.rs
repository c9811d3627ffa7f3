//! In-memory session store.

use std::collections::HashMap;

use parking_lot::RwLock;
use zeroize::Zeroizing;

use super::SessionStore;
use crate::error::Result;

/// Session store backed by a process-lifetime map
///
/// Values are exported key records, so they are wiped when overwritten,
/// removed, or when the store is dropped.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, Zeroizing<String>>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read();
        Ok(entries.get(key).map(|value| String::clone(value)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), Zeroizing::new(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write();
        Ok(entries.remove(key).is_some())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}

impl std::fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        f.debug_struct("MemorySessionStore")
            .field("keys", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemorySessionStore::new();

        store.set("chat_key_1", "value").unwrap();
        assert_eq!(store.get("chat_key_1").unwrap().as_deref(), Some("value"));

        assert!(store.remove("chat_key_1").unwrap());
        assert!(!store.remove("chat_key_1").unwrap());
        assert!(store.get("chat_key_1").unwrap().is_none());
    }

    #[test]
    fn test_last_writer_wins() {
        let store = MemorySessionStore::new();

        store.set("chat_key_1", "first").unwrap();
        store.set("chat_key_1", "second").unwrap();

        assert_eq!(store.get("chat_key_1").unwrap().as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let store = MemorySessionStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_debug_lists_keys_only() {
        let store = MemorySessionStore::new();
        store.set("chat_key_9", "secret-record").unwrap();

        let shown = format!("{:?}", store);
        assert!(shown.contains("chat_key_9"));
        assert!(!shown.contains("secret-record"));
    }
}
