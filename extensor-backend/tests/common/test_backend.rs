//! Simple in-memory test backend implementation using DashMap.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use extensor_backend::{Backend, BackendError, BackendResult, DeleteStatus};
use extensor_core::CacheEntry;

/// Simple in-memory backend for testing using DashMap.
///
/// This backend is thread-safe and can be cloned cheaply (Arc internally).
/// Expired entries are removed lazily when read.
#[derive(Clone)]
pub struct TestBackend<V> {
    store: Arc<DashMap<String, CacheEntry<V>>>,
}

impl<V> TestBackend<V> {
    /// Create a new empty test backend.
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Check if a key is physically present, expired or not.
    pub fn has(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }
}

impl<V> Default for TestBackend<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> Backend<V> for TestBackend<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn read(&self, key: &str) -> BackendResult<Option<V>> {
        match self.store.get(key) {
            None => return Ok(None),
            Some(entry) if !entry.is_expired() => {
                return Ok(Some(entry.value().value().clone()));
            }
            Some(_) => {}
        }
        self.store.remove(key);
        Ok(None)
    }

    async fn write(&self, key: &str, value: V, ttl: Option<Duration>) -> BackendResult<()> {
        self.store.insert(
            key.to_owned(),
            CacheEntry::new(value, ttl.unwrap_or(Duration::ZERO)),
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        let existed = self.store.remove(key).is_some();
        Ok(if existed {
            DeleteStatus::Deleted(1)
        } else {
            DeleteStatus::Missing
        })
    }

    async fn clear(&self) -> BackendResult<()> {
        self.store.clear();
        Ok(())
    }

    async fn size(&self) -> BackendResult<u64> {
        self.store.retain(|_, entry| !entry.is_expired());
        Ok(self.store.len() as u64)
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// Backend that always returns errors (for error testing).
#[derive(Clone, Default)]
pub struct ErrorBackend;

fn simulated() -> BackendError {
    BackendError::InternalError(Box::new(std::io::Error::other("simulated error")))
}

#[async_trait]
impl<V> Backend<V> for ErrorBackend
where
    V: Send + 'static,
{
    async fn read(&self, _key: &str) -> BackendResult<Option<V>> {
        Err(simulated())
    }

    async fn write(&self, _key: &str, _value: V, _ttl: Option<Duration>) -> BackendResult<()> {
        Err(simulated())
    }

    async fn remove(&self, _key: &str) -> BackendResult<DeleteStatus> {
        Err(simulated())
    }

    async fn clear(&self) -> BackendResult<()> {
        Err(simulated())
    }

    async fn size(&self) -> BackendResult<u64> {
        Err(simulated())
    }

    fn name(&self) -> &str {
        "error"
    }
}
