//! Asynchronous key-value map contract.
//!
//! [`AsyncMap`] is the interface every backend implements and every adapter
//! consumes. Keys and values are strings; a missing key is reported as `None`
//! from [`AsyncMap::get`], never as an error.
//!
//! Two implementations ship with this crate: [`MemoryMap`] keeps entries in
//! insertion order in memory, and [`RedbMap`] persists them in a redb file.

pub mod memory;
pub mod redb;

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur in map operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Failure reported by a remote key-value service, carried verbatim.
    #[error("{0}")]
    Backend(String),

    #[error("asyncmap: storage error: {0}")]
    Storage(String),

    /// A `for_each` visitor gave up.
    #[error("asyncmap: visitor error: {0}")]
    Visitor(String),
}

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;

/// An asynchronous key-value container.
///
/// Implementations hold no state of their own beyond the backend handle they
/// are bound to, and must be safe to share between tasks.
#[async_trait]
pub trait AsyncMap: Send + Sync {
    /// Remove every entry.
    async fn clear(&self) -> MapResult<()>;

    /// Remove `key`. Returns whether the entry existed.
    async fn delete(&self, key: &str) -> MapResult<bool>;

    /// Visit every entry once, in iteration order.
    ///
    /// Each visit is awaited before the next entry is read, so visits never
    /// overlap. An error from the visitor stops the iteration and is returned.
    /// Mutating the map while iterating gives unspecified results.
    async fn for_each(&self, visitor: &mut dyn Visitor) -> MapResult<()>;

    /// Get the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> MapResult<Option<String>>;

    /// Whether `key` is present. Agrees with [`AsyncMap::get`].
    async fn has(&self, key: &str) -> MapResult<bool>;

    /// Insert or overwrite an entry.
    async fn set(&self, key: &str, value: &str) -> MapResult<()>;

    /// Number of entries.
    async fn size(&self) -> MapResult<usize>;
}

impl fmt::Debug for dyn AsyncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AsyncMap {{ ... }}")
    }
}

/// Callback invoked by [`AsyncMap::for_each`] with `(value, key, map)`.
///
/// Any state the callback needs lives in the visitor itself. Closures of the
/// shape `FnMut(String, String) -> impl Future<Output = MapResult<()>>`
/// implement this trait as long as the returned future owns its data.
#[async_trait]
pub trait Visitor: Send {
    async fn visit(&mut self, value: String, key: String, map: &dyn AsyncMap) -> MapResult<()>;
}

#[async_trait]
impl<F, Fut> Visitor for F
where
    F: FnMut(String, String) -> Fut + Send,
    Fut: Future<Output = MapResult<()>> + Send + 'static,
{
    async fn visit(&mut self, value: String, key: String, _map: &dyn AsyncMap) -> MapResult<()> {
        (self)(value, key).await
    }
}

/// Visitor that records `(key, value)` pairs in visit order.
#[derive(Debug, Default)]
pub struct Collect {
    pub entries: Vec<(String, String)>,
}

#[async_trait]
impl Visitor for Collect {
    async fn visit(&mut self, value: String, key: String, _map: &dyn AsyncMap) -> MapResult<()> {
        self.entries.push((key, value));
        Ok(())
    }
}

/// Read every entry of `map` in iteration order.
pub async fn entries<M>(map: &M) -> MapResult<Vec<(String, String)>>
where
    M: AsyncMap + ?Sized,
{
    let mut collect = Collect::default();
    map.for_each(&mut collect).await?;
    Ok(collect.entries)
}

// Re-export the implementations
pub use crate::memory::MemoryMap;
pub use crate::redb::RedbMap;
