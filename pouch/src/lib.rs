//! Database-engine storage plugin backed by an [`AsyncMap`](kvpouch_asyncmap::AsyncMap).
//!
//! [`create_kv_pouch`] produces a [`KvPouch`]: a plugin whose every database
//! opens an [`AsyncMapLevel`](kvpouch_level::AsyncMapLevel) over the same
//! shared map and hands it to the engine's [`LevelCore`] library. The plugin
//! adds no behaviour of its own beyond that wiring.

pub mod engine;
pub mod error;
pub mod options;
pub mod plugin;
pub mod registry;

pub use crate::engine::LevelCore;
pub use crate::error::PouchError;
pub use crate::options::{AdapterOptions, DbFactory};
pub use crate::plugin::{KvPouch, StoragePlugin, create_kv_pouch};
pub use crate::registry::AdapterRegistry;
