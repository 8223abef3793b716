use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use kvpouch_asyncmap::AsyncMap;
use tracing::{debug, warn};

use crate::batch::{BatchOp, BatchReport, RawBatchOp, SkippedOp};
use crate::error::{LevelError, LevelResult};
use crate::slice::Slice;
use crate::{GetOptions, Info, LevelDown, OpenOptions, WriteOptions};

/// Storage type reported by [`AsyncMapLevel::info`].
pub const INFO_TYPE: &str = "async-map";

/// Low-level storage backed by an [`AsyncMap`].
///
/// Several instances may share one map; the location is only recorded.
#[derive(Clone)]
pub struct AsyncMapLevel {
    storage: Arc<dyn AsyncMap>,
    location: String,
}

impl AsyncMapLevel {
    pub fn new(storage: Arc<dyn AsyncMap>, location: impl Into<String>) -> Self {
        Self {
            storage,
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn storage(&self) -> &Arc<dyn AsyncMap> {
        &self.storage
    }

    /// Erase the store at `location`.
    ///
    /// Nothing is erased: the map's contents are owned by its backend, so
    /// this only reports success.
    pub async fn destroy(location: &str) -> LevelResult<()> {
        debug!(location, "level: destroy is a no-op");
        Ok(())
    }
}

#[async_trait]
impl LevelDown for AsyncMapLevel {
    async fn open(&self, _options: &OpenOptions) -> LevelResult<()> {
        debug!(location = %self.location, "level: open");
        Ok(())
    }

    async fn get(&self, key: Slice, options: &GetOptions) -> LevelResult<Slice> {
        let key = key.into_string()?;
        match self.storage.get(&key).await? {
            Some(value) if options.as_buffer => Ok(Slice::Bytes(value.into_bytes())),
            Some(value) => Ok(Slice::Str(value)),
            None => Err(LevelError::NotFound),
        }
    }

    async fn put(&self, key: Slice, value: Slice, _options: &WriteOptions) -> LevelResult<()> {
        let key = key.into_string()?;
        let value = value.into_string()?;
        self.storage.set(&key, &value).await?;
        Ok(())
    }

    async fn del(&self, key: Slice, _options: &WriteOptions) -> LevelResult<()> {
        let key = key.into_string()?;
        self.storage.delete(&key).await?;
        Ok(())
    }

    async fn batch(
        &self,
        ops: Vec<Option<RawBatchOp>>,
        _options: &WriteOptions,
    ) -> LevelResult<BatchReport> {
        let mut report = BatchReport::default();
        let mut pending = Vec::with_capacity(ops.len());
        for (index, raw) in ops.into_iter().enumerate() {
            match BatchOp::parse(raw) {
                Ok(op) => pending.push(op),
                Err(reason) => {
                    warn!(index, %reason, "level: skipping batch entry");
                    report.skipped.push(SkippedOp { index, reason });
                }
            }
        }

        let storage = &self.storage;
        let results = join_all(pending.into_iter().map(|op| async move {
            match op {
                BatchOp::Put { key, value } => storage.set(&key, &value).await,
                BatchOp::Del { key } => storage.delete(&key).await.map(|_| ()),
            }
        }))
        .await;

        report.applied = results.len();
        debug!(
            applied = report.applied,
            skipped = report.skipped.len(),
            "level: batch settled"
        );
        for result in results {
            result?;
        }
        Ok(report)
    }

    async fn info(&self) -> LevelResult<Info> {
        Ok(Info {
            kind: INFO_TYPE.to_string(),
        })
    }
}
