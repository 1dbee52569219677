//! String-keyed durable storage port
//!
//! The task list lives under a single key as one JSON document. Adapters
//! decide where the bytes go; the store only reads once and overwrites
//! wholesale.

use std::collections::HashMap;

use crate::error::Result;

/// Key under which the task list is stored
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// A blocking key-value string store
pub trait Storage {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage, used for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one entry
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut items = HashMap::new();
        items.insert(key.into(), value.into());
        Self { items }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
