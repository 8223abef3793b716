use std::collections::HashSet;

use async_trait::async_trait;
use kvpouch_asyncmap::{AsyncMap, MapError, MapResult, Visitor};
use tracing::{debug, warn};

use crate::KVMapConfig;
use crate::namespace::{ListOptions, Namespace};

/// An [`AsyncMap`] over a key-value namespace service.
///
/// Listing-based operations (`clear`, `size`, `for_each`) follow the listing
/// cursor until the namespace reports the listing complete, so they see every
/// key no matter how the service pages its results. Iteration order is the
/// service's listing order.
pub struct KVMap<N> {
    ns: N,
    config: KVMapConfig,
}

impl<N: Namespace> KVMap<N> {
    /// Create a map over `ns` with the default configuration.
    pub fn new(ns: N) -> Self {
        Self::with_config(ns, KVMapConfig::default())
    }

    pub fn with_config(ns: N, config: KVMapConfig) -> Self {
        Self { ns, config }
    }

    pub fn namespace(&self) -> &N {
        &self.ns
    }

    pub fn config(&self) -> &KVMapConfig {
        &self.config
    }

    /// List every key visible to this map, in listing order.
    ///
    /// A page that claims more keys follow but carries no cursor, or a cursor
    /// already used, fails the listing with [`MapError::Backend`] rather than
    /// returning a partial key set.
    pub async fn keys(&self) -> MapResult<Vec<String>> {
        let mut options = ListOptions {
            prefix: self.config.prefix.clone(),
            limit: Some(self.config.page_limit),
            cursor: None,
        };
        let mut keys = Vec::new();
        let mut pages = 0usize;
        let mut seen = HashSet::new();
        loop {
            let page = self.ns.list(&options).await?;
            pages += 1;
            keys.extend(page.keys.into_iter().map(|k| k.name));
            if page.list_complete {
                break;
            }
            match page.cursor {
                Some(cursor) if seen.insert(cursor.clone()) => {
                    options.cursor = Some(cursor);
                }
                cursor => {
                    let reason = match cursor {
                        Some(c) => format!("cursor {c:?} repeated"),
                        None => "no cursor".to_string(),
                    };
                    warn!(pages, keys = keys.len(), %reason, "kvmap: listing incomplete");
                    return Err(MapError::Backend(format!(
                        "kvmap: listing incomplete after {pages} pages: {reason}"
                    )));
                }
            }
        }
        debug!(pages, keys = keys.len(), "kvmap: listed keys");
        Ok(keys)
    }
}

#[async_trait]
impl<N: Namespace> AsyncMap for KVMap<N> {
    async fn clear(&self) -> MapResult<()> {
        let keys = self.keys().await?;
        for key in &keys {
            self.ns.delete(key).await?;
        }
        debug!(removed = keys.len(), "kvmap: clear");
        Ok(())
    }

    async fn delete(&self, key: &str) -> MapResult<bool> {
        // The service's delete does not say whether the key was there.
        let exists = self.has(key).await?;
        if exists {
            self.ns.delete(key).await?;
        }
        debug!(key, exists, "kvmap: delete");
        Ok(exists)
    }

    async fn for_each(&self, visitor: &mut dyn Visitor) -> MapResult<()> {
        for key in self.keys().await? {
            match self.ns.get(&key).await? {
                Some(value) => visitor.visit(value, key, self).await?,
                None => debug!(key, "kvmap: key vanished during for_each"),
            }
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> MapResult<Option<String>> {
        debug!(key, "kvmap: get");
        self.ns.get(key).await
    }

    async fn has(&self, key: &str) -> MapResult<bool> {
        Ok(self.ns.get(key).await?.is_some())
    }

    async fn set(&self, key: &str, value: &str) -> MapResult<()> {
        debug!(key, len = value.len(), "kvmap: set");
        self.ns.put(key, value).await
    }

    async fn size(&self) -> MapResult<usize> {
        Ok(self.keys().await?.len())
    }
}
