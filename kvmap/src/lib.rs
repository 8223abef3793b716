//! AsyncMap bindings over key-value namespace services.
//!
//! A [`Namespace`] is the remote service: a paginated `list` plus single-key
//! `get`, `put` and `delete`. [`KVMap`] implements
//! [`AsyncMap`](kvpouch_asyncmap::AsyncMap) on top of it; [`EnvKVMap`] is the
//! same binding carrying the environment object the namespace came from.
//!
//! Service errors are passed through unchanged and are never turned into
//! "absent" results.

pub mod env;
pub mod kvmap;
pub mod memory;
pub mod namespace;

use serde::{Deserialize, Serialize};

pub use crate::env::EnvKVMap;
pub use crate::kvmap::KVMap;
pub use crate::memory::MemoryNamespace;
pub use crate::namespace::{KeyInfo, ListOptions, ListPage, MAX_LIST_LIMIT, Namespace};

/// Listing configuration shared by both bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KVMapConfig {
    /// Keys requested per `list` call.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Restrict listings (`clear`, `size`, `for_each`) to keys with this
    /// prefix. Single-key operations are not affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

fn default_page_limit() -> usize {
    MAX_LIST_LIMIT
}

impl Default for KVMapConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
            prefix: None,
        }
    }
}
