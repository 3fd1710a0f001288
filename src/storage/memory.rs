use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Storage, StorageError};

#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value without going through the async contract.
    #[cfg(test)]
    pub fn with_entry(self, key: &str, value: Value) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
        self
    }

    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.snapshot(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::Other, "memory storage poisoned")
            })?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
