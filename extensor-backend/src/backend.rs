use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{BackendError, DeleteStatus};

pub type BackendResult<T> = Result<T, BackendError>;

/// Key/value store the cache drives.
///
/// Implementations must treat an expired entry as absent in [`read`](Backend::read).
/// Whether expired entries are removed lazily on read or swept in the background
/// is up to the implementation.
///
/// All methods take `&self`: implementations are shared between concurrently
/// running cache operations and must tolerate concurrent reads and writes.
#[async_trait]
pub trait Backend<V>: Sync + Send
where
    V: Send + 'static,
{
    /// Returns the live value stored for `key`.
    async fn read(&self, key: &str) -> BackendResult<Option<V>>;

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl` of `None` means the entry never expires.
    async fn write(&self, key: &str, value: V, ttl: Option<Duration>) -> BackendResult<()>;

    /// Removes `key`.
    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus>;

    /// Removes every entry.
    async fn clear(&self) -> BackendResult<()>;

    /// Number of live entries.
    async fn size(&self) -> BackendResult<u64>;

    /// Returns the name of this backend for logs and metrics.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl<V> Backend<V> for &dyn Backend<V>
where
    V: Send + 'static,
{
    async fn read(&self, key: &str) -> BackendResult<Option<V>> {
        (*self).read(key).await
    }

    async fn write(&self, key: &str, value: V, ttl: Option<Duration>) -> BackendResult<()> {
        (*self).write(key, value, ttl).await
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        (*self).remove(key).await
    }

    async fn clear(&self) -> BackendResult<()> {
        (*self).clear().await
    }

    async fn size(&self) -> BackendResult<u64> {
        (*self).size().await
    }

    fn name(&self) -> &str {
        (*self).name()
    }
}

#[async_trait]
impl<V> Backend<V> for Box<dyn Backend<V>>
where
    V: Send + 'static,
{
    async fn read(&self, key: &str) -> BackendResult<Option<V>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: V, ttl: Option<Duration>) -> BackendResult<()> {
        (**self).write(key, value, ttl).await
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    async fn clear(&self) -> BackendResult<()> {
        (**self).clear().await
    }

    async fn size(&self) -> BackendResult<u64> {
        (**self).size().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<V> Backend<V> for Arc<dyn Backend<V>>
where
    V: Send + 'static,
{
    async fn read(&self, key: &str) -> BackendResult<Option<V>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: V, ttl: Option<Duration>) -> BackendResult<()> {
        (**self).write(key, value, ttl).await
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    async fn clear(&self) -> BackendResult<()> {
        (**self).clear().await
    }

    async fn size(&self) -> BackendResult<u64> {
        (**self).size().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
