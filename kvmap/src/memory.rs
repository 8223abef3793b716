//! In-memory namespace implementation for testing.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use kvpouch_asyncmap::{MapError, MapResult};

use crate::namespace::{KeyInfo, ListOptions, ListPage, MAX_LIST_LIMIT, Namespace};

#[derive(Default)]
struct State {
    data: BTreeMap<String, String>,
    failure: Option<String>,
}

/// An in-memory namespace that lists keys lexicographically and pages like a
/// managed service.
///
/// Pages hold at most `max_page` keys regardless of the requested limit.
/// Cursors are the last key of the previous page. Clones share state.
#[derive(Clone)]
pub struct MemoryNamespace {
    state: Arc<Mutex<State>>,
    max_page: usize,
    list_calls: Arc<AtomicUsize>,
}

impl Default for MemoryNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNamespace {
    pub fn new() -> Self {
        Self::with_max_page(MAX_LIST_LIMIT)
    }

    /// Create a namespace whose pages never exceed `max_page` keys.
    pub fn with_max_page(max_page: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            max_page: max_page.max(1),
            list_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every subsequent call fail with `MapError::Backend(message)`.
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = Some(message.into());
        }
    }

    pub fn recover(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = None;
        }
    }

    /// Number of `list` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of stored keys, bypassing the listing API.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.data.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MapResult<MutexGuard<'_, State>> {
        let state = self
            .state
            .lock()
            .map_err(|e| MapError::Backend(e.to_string()))?;
        if let Some(message) = &state.failure {
            return Err(MapError::Backend(message.clone()));
        }
        Ok(state)
    }
}

#[async_trait]
impl Namespace for MemoryNamespace {
    async fn list(&self, options: &ListOptions) -> MapResult<ListPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock()?;
        let limit = options
            .limit
            .unwrap_or(MAX_LIST_LIMIT)
            .clamp(1, self.max_page);
        let prefix = options.prefix.as_deref().unwrap_or("");

        let lower = match &options.cursor {
            Some(cursor) => Bound::Excluded(cursor.clone()),
            None => Bound::Unbounded,
        };
        let mut matching = state
            .data
            .range::<String, _>((lower, Bound::Unbounded))
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(prefix));

        let keys: Vec<KeyInfo> = matching
            .by_ref()
            .take(limit)
            .map(|k| KeyInfo { name: k.clone() })
            .collect();
        let list_complete = matching.next().is_none();
        let cursor = if list_complete {
            None
        } else {
            keys.last().map(|k| k.name.clone())
        };

        Ok(ListPage {
            keys,
            list_complete,
            cursor,
        })
    }

    async fn get(&self, key: &str) -> MapResult<Option<String>> {
        Ok(self.lock()?.data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> MapResult<()> {
        self.lock()?.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> MapResult<()> {
        self.lock()?.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_pages() {
        let ns = MemoryNamespace::with_max_page(2);
        for key in ["a", "b", "c", "d", "e"] {
            ns.put(key, "v").await.unwrap();
        }

        let first = ns.list(&ListOptions::default()).await.unwrap();
        assert_eq!(first.keys.len(), 2);
        assert!(!first.list_complete);
        assert_eq!(first.cursor.as_deref(), Some("b"));

        let rest = ns
            .list(&ListOptions {
                cursor: first.cursor,
                limit: Some(10),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = rest.keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["c", "d"]);
        assert_eq!(ns.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_list_prefix() {
        let ns = MemoryNamespace::new();
        ns.put("doc:1", "a").await.unwrap();
        ns.put("doc:2", "b").await.unwrap();
        ns.put("meta:1", "c").await.unwrap();

        let page = ns
            .list(&ListOptions {
                prefix: Some("doc:".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.keys.len(), 2);
        assert!(page.list_complete);
        assert_eq!(page.cursor, None);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let ns = MemoryNamespace::new();
        ns.fail_with("quota exceeded");
        assert_eq!(
            ns.get("k").await.unwrap_err(),
            MapError::Backend("quota exceeded".into())
        );
        ns.recover();
        assert_eq!(ns.get("k").await.unwrap(), None);
    }
}
