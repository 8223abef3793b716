//! Completion-callback form of the low-level storage interface.
//!
//! Hosts written against callback-style storage pass a completion function
//! with every call. Each method here spawns the operation on the current
//! tokio runtime and invokes the callback exactly once with the result, from
//! the spawned task rather than from inside the call. Calling any method
//! outside a tokio runtime panics.

use std::sync::Arc;

use crate::batch::{BatchReport, RawBatchOp};
use crate::error::LevelResult;
use crate::level::AsyncMapLevel;
use crate::slice::Slice;
use crate::{GetOptions, Info, LevelDown, OpenOptions, WriteOptions};

/// Callback-style front for any [`LevelDown`].
#[derive(Clone)]
pub struct CallbackLevel {
    inner: Arc<dyn LevelDown>,
}

impl CallbackLevel {
    pub fn new(inner: Arc<dyn LevelDown>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Arc<dyn LevelDown> {
        &self.inner
    }

    /// Open the store. The callback receives the opened handle.
    pub fn open<F>(&self, options: OpenOptions, callback: F)
    where
        F: FnOnce(LevelResult<Arc<dyn LevelDown>>) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let opened = inner.open(&options).await;
            callback(opened.map(|()| inner));
        });
    }

    pub fn get<F>(&self, key: impl Into<Slice>, options: GetOptions, callback: F)
    where
        F: FnOnce(LevelResult<Slice>) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let key = key.into();
        tokio::spawn(async move {
            callback(inner.get(key, &options).await);
        });
    }

    pub fn put<F>(
        &self,
        key: impl Into<Slice>,
        value: impl Into<Slice>,
        options: WriteOptions,
        callback: F,
    ) where
        F: FnOnce(LevelResult<()>) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let (key, value) = (key.into(), value.into());
        tokio::spawn(async move {
            callback(inner.put(key, value, &options).await);
        });
    }

    pub fn del<F>(&self, key: impl Into<Slice>, options: WriteOptions, callback: F)
    where
        F: FnOnce(LevelResult<()>) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let key = key.into();
        tokio::spawn(async move {
            callback(inner.del(key, &options).await);
        });
    }

    pub fn batch<F>(&self, ops: Vec<Option<RawBatchOp>>, options: WriteOptions, callback: F)
    where
        F: FnOnce(LevelResult<BatchReport>) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            callback(inner.batch(ops, &options).await);
        });
    }

    pub fn info<F>(&self, callback: F)
    where
        F: FnOnce(LevelResult<Info>) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            callback(inner.info().await);
        });
    }

    /// Callback form of [`AsyncMapLevel::destroy`].
    pub fn destroy<F>(location: impl Into<String>, callback: F)
    where
        F: FnOnce(LevelResult<()>) + Send + 'static,
    {
        let location = location.into();
        tokio::spawn(async move {
            callback(AsyncMapLevel::destroy(&location).await);
        });
    }
}

impl From<AsyncMapLevel> for CallbackLevel {
    fn from(level: AsyncMapLevel) -> Self {
        Self::new(Arc::new(level))
    }
}
