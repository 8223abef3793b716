use std::sync::Arc;

use kvpouch_asyncmap::AsyncMap;
use kvpouch_level::{AsyncMapLevel, LevelDown};
use tracing::debug;

use crate::engine::LevelCore;
use crate::error::PouchError;
use crate::options::{AdapterOptions, DbFactory};

/// What the engine's adapter registration needs to know about a plugin.
pub trait StoragePlugin: Send + Sync {
    /// Whether the plugin can run in this environment.
    fn valid(&self) -> bool;

    /// Whether the engine should prefix keys per database.
    fn use_prefix(&self) -> bool;

    /// Store factory merged into constructor options by default.
    fn db_factory(&self) -> DbFactory;
}

/// Storage plugin whose databases all live in one shared [`AsyncMap`].
///
/// The capability flags are fixed: `valid()` is always true and
/// `use_prefix` is false, each database being expected to sit in a
/// namespace of its own.
#[derive(Clone)]
pub struct KvPouch {
    map: Arc<dyn AsyncMap>,
    pub use_prefix: bool,
}

/// Create the storage plugin for `map`.
pub fn create_kv_pouch(map: Arc<dyn AsyncMap>) -> KvPouch {
    KvPouch {
        map,
        use_prefix: false,
    }
}

impl KvPouch {
    /// No environment probing is done; the map is assumed reachable.
    pub fn valid(&self) -> bool {
        true
    }

    pub fn map(&self) -> &Arc<dyn AsyncMap> {
        &self.map
    }

    /// Fill in the default store factory unless the caller supplied one.
    pub fn options(&self, mut options: AdapterOptions) -> AdapterOptions {
        if options.db.is_none() {
            options.db = Some(self.db_factory());
        }
        options
    }

    /// Construct a database through `core` with this plugin's storage.
    pub async fn construct<C>(
        &self,
        core: &C,
        options: AdapterOptions,
    ) -> Result<C::Adapter, PouchError>
    where
        C: LevelCore,
    {
        let options = self.options(options);
        debug!(name = %options.name, "pouch: construct");
        core.construct(options).await
    }

    /// `(options, callback)` form of [`KvPouch::construct`]. Runs on the
    /// current tokio runtime and calls `callback` once.
    pub fn construct_with<C, F>(&self, core: Arc<C>, options: AdapterOptions, callback: F)
    where
        C: LevelCore + 'static,
        F: FnOnce(Result<C::Adapter, PouchError>) + Send + 'static,
    {
        let options = self.options(options);
        tokio::spawn(async move {
            callback(core.construct(options).await);
        });
    }
}

impl StoragePlugin for KvPouch {
    fn valid(&self) -> bool {
        KvPouch::valid(self)
    }

    fn use_prefix(&self) -> bool {
        self.use_prefix
    }

    fn db_factory(&self) -> DbFactory {
        let map = Arc::clone(&self.map);
        Arc::new(move |location: &str| -> Arc<dyn LevelDown> {
            Arc::new(AsyncMapLevel::new(Arc::clone(&map), location))
        })
    }
}
