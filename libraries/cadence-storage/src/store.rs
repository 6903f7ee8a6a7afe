//! Namespaced record stores
//!
//! A `StateStore` keeps one opaque string record per namespace. The playback
//! layer only ever writes full records, so no partial update is offered.

use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Key-value store of namespaced records
pub trait StateStore {
    /// Read the record stored under `namespace`
    fn get(&self, namespace: &str) -> Result<Option<String>>;

    /// Replace the record stored under `namespace`
    fn put(&self, namespace: &str, record: &str) -> Result<()>;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn get(&self, namespace: &str) -> Result<Option<String>> {
        (**self).get(namespace)
    }

    fn put(&self, namespace: &str, record: &str) -> Result<()> {
        (**self).put(namespace, record)
    }
}

/// In-memory store
///
/// Clones share the same records, so a test can keep a handle after handing
/// the store to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryStore {
    fn get(&self, namespace: &str) -> Result<Option<String>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(namespace).cloned())
    }

    fn put(&self, namespace: &str, record: &str) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.insert(namespace.to_string(), record.to_string());
        Ok(())
    }
}
