//! Moka backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use extensor_backend::{Backend, BackendResult, DeleteStatus};
use extensor_core::CacheEntry;
use moka::future::Cache;
use smol_str::SmolStr;

use crate::builder::{MokaBackendBuilder, NoCapacity};

/// In-memory store powered by Moka.
///
/// `MokaBackend` is a concurrent in-memory map with per-entry expiration. It
/// uses Moka's async cache internally, which offers lock-free reads and
/// fine-grained locking for writes, so it can be shared by any number of
/// in-flight cache operations.
///
/// # Examples
///
/// ```
/// use extensor_moka::MokaBackend;
///
/// let backend = MokaBackend::<u64>::builder()
///     .label("sessions")
///     .max_entries(1_000)
///     .build();
/// ```
///
/// # Caveats
///
/// - Data is **not persisted**: the store is lost on process restart
/// - Data is **not shared** across processes
/// - Bounded stores evict entries on their own when full, independently of TTL
#[derive(Clone)]
pub struct MokaBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub(crate) cache: Cache<String, CacheEntry<V>>,
    pub(crate) label: SmolStr,
}

impl<V> std::fmt::Debug for MokaBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("label", &self.label)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl<V> MokaBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new builder for `MokaBackend`.
    ///
    /// A capacity must be chosen with
    /// [`max_entries()`](MokaBackendBuilder::max_entries) or
    /// [`unbounded()`](MokaBackendBuilder::unbounded) before calling `build()`.
    pub fn builder() -> MokaBackendBuilder<V, NoCapacity> {
        MokaBackendBuilder::new()
    }

    /// Returns the underlying Moka cache.
    pub fn cache(&self) -> &Cache<String, CacheEntry<V>> {
        &self.cache
    }

    /// Returns the stored entry for `key` with its metadata, if still live.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<V>> {
        self.cache.get(key).await.filter(|entry| !entry.is_expired())
    }
}

#[async_trait]
impl<V> Backend<V> for MokaBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn read(&self, key: &str) -> BackendResult<Option<V>> {
        Ok(self.entry(key).await.map(CacheEntry::into_value))
    }

    async fn write(&self, key: &str, value: V, ttl: Option<Duration>) -> BackendResult<()> {
        let entry = CacheEntry::new(value, ttl.unwrap_or(Duration::ZERO));
        self.cache.insert(key.to_owned(), entry).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        let value = self.cache.remove(key).await;
        match value {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    async fn clear(&self) -> BackendResult<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> BackendResult<u64> {
        // Moka's expiry wheel lags behind entry deadlines, so count live entries.
        self.cache.run_pending_tasks().await;
        let entries = self
            .cache
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .count() as u64;
        crate::metrics::record_capacity(&self.label, entries);
        Ok(entries)
    }

    fn name(&self) -> &str {
        &self.label
    }
}
