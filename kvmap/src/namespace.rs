//! Key-value namespace service interface.

use std::sync::Arc;

use async_trait::async_trait;
use kvpouch_asyncmap::MapResult;
use serde::{Deserialize, Serialize};

/// Largest page a managed namespace returns from one `list` call.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Options for a single `list` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Only list keys starting with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Maximum number of keys to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Continuation token from a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A key descriptor returned by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub name: String,
}

/// One page of a key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    pub keys: Vec<KeyInfo>,

    /// True when no further pages exist.
    pub list_complete: bool,

    /// Token for the next page when `list_complete` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A remote key-value namespace.
///
/// Failures are reported as [`kvpouch_asyncmap::MapError::Backend`] and are
/// passed through every adapter unchanged. `get` returns `None` for missing
/// keys; `delete` does not report whether the key existed.
#[async_trait]
pub trait Namespace: Send + Sync {
    async fn list(&self, options: &ListOptions) -> MapResult<ListPage>;

    async fn get(&self, key: &str) -> MapResult<Option<String>>;

    async fn put(&self, key: &str, value: &str) -> MapResult<()>;

    async fn delete(&self, key: &str) -> MapResult<()>;
}

#[async_trait]
impl<N: Namespace + ?Sized> Namespace for Arc<N> {
    async fn list(&self, options: &ListOptions) -> MapResult<ListPage> {
        (**self).list(options).await
    }

    async fn get(&self, key: &str) -> MapResult<Option<String>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> MapResult<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> MapResult<()> {
        (**self).delete(key).await
    }
}
