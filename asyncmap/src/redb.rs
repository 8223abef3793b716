//! Redb-based persistent map implementation.

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ::redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::{AsyncMap, MapError, MapResult, Visitor};

const TABLE: TableDefinition<&str, &str> = TableDefinition::new("asyncmap");

fn storage<E: Display>(e: E) -> MapError {
    MapError::Storage(e.to_string())
}

/// A persistent map backed by redb.
///
/// Iteration follows key order, which is stable across calls. Blocking redb
/// transactions run on the tokio blocking pool.
#[derive(Clone)]
pub struct RedbMap {
    db: Arc<Database>,
}

impl RedbMap {
    /// Open or create a redb map at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> MapResult<Self> {
        let db = Database::create(path).map_err(storage)?;

        // Create the table if it doesn't exist
        let tx = db.begin_write().map_err(storage)?;
        {
            let _ = tx.open_table(TABLE).map_err(storage)?;
        }
        tx.commit().map_err(storage)?;

        Ok(Self { db: Arc::new(db) })
    }

    async fn blocking<T, F>(&self, f: F) -> MapResult<T>
    where
        F: FnOnce(&Database) -> MapResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(storage)?
    }

    async fn snapshot(&self) -> MapResult<Vec<(String, String)>> {
        self.blocking(|db| {
            let tx = db.begin_read().map_err(storage)?;
            let table = tx.open_table(TABLE).map_err(storage)?;
            let mut results = Vec::new();
            for item in table.iter().map_err(storage)? {
                let (key, value) = item.map_err(storage)?;
                results.push((key.value().to_string(), value.value().to_string()));
            }
            Ok(results)
        })
        .await
    }
}

#[async_trait]
impl AsyncMap for RedbMap {
    async fn clear(&self) -> MapResult<()> {
        self.blocking(|db| {
            let tx = db.begin_write().map_err(storage)?;
            {
                let mut table = tx.open_table(TABLE).map_err(storage)?;
                let mut keys = Vec::new();
                for item in table.iter().map_err(storage)? {
                    let (key, _) = item.map_err(storage)?;
                    keys.push(key.value().to_string());
                }
                for key in &keys {
                    table.remove(key.as_str()).map_err(storage)?;
                }
                debug!(removed = keys.len(), "redb map: clear");
            }
            tx.commit().map_err(storage)
        })
        .await
    }

    async fn delete(&self, key: &str) -> MapResult<bool> {
        let key = key.to_string();
        self.blocking(move |db| {
            let tx = db.begin_write().map_err(storage)?;
            let existed = {
                let mut table = tx.open_table(TABLE).map_err(storage)?;
                let removed = table.remove(key.as_str()).map_err(storage)?;
                removed.is_some()
            };
            tx.commit().map_err(storage)?;
            Ok(existed)
        })
        .await
    }

    async fn for_each(&self, visitor: &mut dyn Visitor) -> MapResult<()> {
        for (key, value) in self.snapshot().await? {
            visitor.visit(value, key, self).await?;
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> MapResult<Option<String>> {
        let key = key.to_string();
        self.blocking(move |db| {
            let tx = db.begin_read().map_err(storage)?;
            let table = tx.open_table(TABLE).map_err(storage)?;
            let value = table.get(key.as_str()).map_err(storage)?;
            Ok(value.map(|v| v.value().to_string()))
        })
        .await
    }

    async fn has(&self, key: &str) -> MapResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn set(&self, key: &str, value: &str) -> MapResult<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.blocking(move |db| {
            let tx = db.begin_write().map_err(storage)?;
            {
                let mut table = tx.open_table(TABLE).map_err(storage)?;
                table
                    .insert(key.as_str(), value.as_str())
                    .map_err(storage)?;
            }
            tx.commit().map_err(storage)
        })
        .await
    }

    async fn size(&self) -> MapResult<usize> {
        self.blocking(|db| {
            let tx = db.begin_read().map_err(storage)?;
            let table = tx.open_table(TABLE).map_err(storage)?;
            let mut count = 0;
            for item in table.iter().map_err(storage)? {
                item.map_err(storage)?;
                count += 1;
            }
            Ok(count)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_redb_basic() {
        let dir = tempdir().unwrap();
        let map = RedbMap::open(dir.path().join("test.redb")).unwrap();

        map.set("key1", "value1").await.unwrap();
        assert_eq!(map.get("key1").await.unwrap(), Some("value1".to_string()));
        assert!(map.has("key1").await.unwrap());

        assert!(map.delete("key1").await.unwrap());
        assert!(!map.delete("key1").await.unwrap());
        assert_eq!(map.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redb_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.redb");
        {
            let map = RedbMap::open(&path).unwrap();
            map.set("b", "2").await.unwrap();
            map.set("a", "1").await.unwrap();
        }

        let map = RedbMap::open(&path).unwrap();
        assert_eq!(map.size().await.unwrap(), 2);
        assert_eq!(
            entries(&map).await.unwrap(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_redb_clear() {
        let dir = tempdir().unwrap();
        let map = RedbMap::open(dir.path().join("test.redb")).unwrap();
        for i in 0..10 {
            map.set(&format!("k{i}"), "v").await.unwrap();
        }
        map.clear().await.unwrap();
        assert_eq!(map.size().await.unwrap(), 0);
    }
}
