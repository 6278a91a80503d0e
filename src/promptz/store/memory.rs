use super::KvBackend;
use crate::error::Result;
use std::collections::HashMap;

/// In-memory backend for tests. Nothing is persisted.
#[derive(Debug, Default, Clone)]
pub struct MemBackend {
    entries: HashMap<String, String>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, for tests that start from existing data.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KvBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
