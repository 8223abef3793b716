//! LevelDB-style low-level storage over an [`AsyncMap`](kvpouch_asyncmap::AsyncMap).
//!
//! [`LevelDown`] is the storage interface database-engine adapters are written
//! against: `open`, `get`, `put`, `del`, `batch` and `info`, with a missing
//! key reported as the error whose message is exactly `NotFound`.
//! [`AsyncMapLevel`] implements it by forwarding to a shared map.
//! [`CallbackLevel`] exposes the same operations in completion-callback form.

pub mod batch;
pub mod callback;
pub mod error;
pub mod level;
pub mod slice;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::batch::{BatchReport, RawBatchOp, SkipReason, SkippedOp};
pub use crate::callback::CallbackLevel;
pub use crate::error::{LevelError, LevelResult, NOT_FOUND};
pub use crate::level::{AsyncMapLevel, INFO_TYPE};
pub use crate::slice::Slice;

/// Options accepted by `open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOptions {
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    #[serde(default)]
    pub error_if_exists: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            error_if_exists: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Options accepted by `get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOptions {
    /// Return the value as bytes instead of a string.
    #[serde(default)]
    pub as_buffer: bool,
}

/// Options accepted by `put`, `del` and `batch`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    #[serde(default)]
    pub sync: bool,
}

/// Descriptor returned by `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Low-level storage interface.
///
/// Lifecycle is `open` followed by any number of reads and writes; there is
/// no close. Implementations report a missing key from `get` as
/// [`LevelError::NotFound`] and pass every other failure through.
#[async_trait]
pub trait LevelDown: Send + Sync {
    async fn open(&self, options: &OpenOptions) -> LevelResult<()>;

    async fn get(&self, key: Slice, options: &GetOptions) -> LevelResult<Slice>;

    async fn put(&self, key: Slice, value: Slice, options: &WriteOptions) -> LevelResult<()>;

    async fn del(&self, key: Slice, options: &WriteOptions) -> LevelResult<()>;

    /// Apply a batch. Entries are dispatched together with no ordering or
    /// atomicity; malformed entries are skipped and listed in the report.
    async fn batch(
        &self,
        ops: Vec<Option<RawBatchOp>>,
        options: &WriteOptions,
    ) -> LevelResult<BatchReport>;

    async fn info(&self) -> LevelResult<Info>;
}
