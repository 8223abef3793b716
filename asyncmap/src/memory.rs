//! In-memory map implementation for testing.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::debug;

use crate::{AsyncMap, MapError, MapResult, Visitor};

/// An in-memory map that iterates in insertion order.
///
/// Overwriting a key keeps its original position; deleting and re-inserting
/// moves it to the end. Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryMap {
    data: Arc<Mutex<IndexMap<String, String>>>,
}

impl MemoryMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MapResult<MutexGuard<'_, IndexMap<String, String>>> {
        self.data
            .lock()
            .map_err(|e| MapError::Storage(e.to_string()))
    }
}

#[async_trait]
impl AsyncMap for MemoryMap {
    async fn clear(&self) -> MapResult<()> {
        self.lock()?.clear();
        Ok(())
    }

    async fn delete(&self, key: &str) -> MapResult<bool> {
        Ok(self.lock()?.shift_remove(key).is_some())
    }

    async fn for_each(&self, visitor: &mut dyn Visitor) -> MapResult<()> {
        // Snapshot so visitors may call back into the map.
        let snapshot: Vec<(String, String)> = self
            .lock()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        debug!(entries = snapshot.len(), "memory map: for_each");
        for (key, value) in snapshot {
            visitor.visit(value, key, self).await?;
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> MapResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn has(&self, key: &str) -> MapResult<bool> {
        Ok(self.lock()?.contains_key(key))
    }

    async fn set(&self, key: &str, value: &str) -> MapResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn size(&self) -> MapResult<usize> {
        Ok(self.lock()?.len())
    }
}
