use async_trait::async_trait;

use crate::error::PouchError;
use crate::options::AdapterOptions;

/// The LevelDB-core engine library a plugin delegates to.
///
/// It owns all document-storage behaviour (revision trees, attachments,
/// queries) and opens its low-level store through `options.db`.
#[async_trait]
pub trait LevelCore: Send + Sync {
    /// The engine's per-database adapter.
    type Adapter: Send;

    async fn construct(&self, options: AdapterOptions) -> Result<Self::Adapter, PouchError>;
}
