use std::fmt;
use std::future::Future;
use std::sync::Arc;

use extensor_core::{
    CallbackResult, EvictCallback, KeyContext, ReadCallback, WriteCallback,
};
use indexmap::IndexMap;

/// Named callbacks that settings documents refer to.
///
/// Read, write and evict callbacks live in separate namespaces; write callbacks
/// serve both the `callback` and `update` fields of a write section.
pub struct CallbackSet<V> {
    readers: IndexMap<String, Arc<dyn ReadCallback<V>>>,
    writers: IndexMap<String, Arc<dyn WriteCallback<V>>>,
    evicters: IndexMap<String, Arc<dyn EvictCallback>>,
}

impl<V> fmt::Debug for CallbackSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSet")
            .field("readers", &self.readers.keys().collect::<Vec<_>>())
            .field("writers", &self.writers.keys().collect::<Vec<_>>())
            .field("evicters", &self.evicters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<V> Default for CallbackSet<V> {
    fn default() -> Self {
        Self {
            readers: IndexMap::new(),
            writers: IndexMap::new(),
            evicters: IndexMap::new(),
        }
    }
}

impl<V> CallbackSet<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a read callback under `name`, replacing any previous one.
    pub fn read<F, Fut>(self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(KeyContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<V>> + Send + 'static,
    {
        self.read_callback(name, Arc::new(callback))
    }

    /// Registers a write callback under `name`, replacing any previous one.
    pub fn write<F, Fut>(self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(KeyContext, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<()>> + Send + 'static,
    {
        self.write_callback(name, Arc::new(callback))
    }

    /// Registers an evict callback under `name`, replacing any previous one.
    pub fn evict<F, Fut>(self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(KeyContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<()>> + Send + 'static,
    {
        self.evict_callback(name, Arc::new(callback))
    }

    /// Registers a shared read callback under `name`.
    pub fn read_callback(
        mut self,
        name: impl Into<String>,
        callback: Arc<dyn ReadCallback<V>>,
    ) -> Self {
        self.readers.insert(name.into(), callback);
        self
    }

    /// Registers a shared write callback under `name`.
    pub fn write_callback(
        mut self,
        name: impl Into<String>,
        callback: Arc<dyn WriteCallback<V>>,
    ) -> Self {
        self.writers.insert(name.into(), callback);
        self
    }

    /// Registers a shared evict callback under `name`.
    pub fn evict_callback(
        mut self,
        name: impl Into<String>,
        callback: Arc<dyn EvictCallback>,
    ) -> Self {
        self.evicters.insert(name.into(), callback);
        self
    }
}

impl<V> CallbackSet<V> {
    /// Looks up a read callback.
    pub fn reader(&self, name: &str) -> Option<&Arc<dyn ReadCallback<V>>> {
        self.readers.get(name)
    }

    /// Looks up a write callback.
    pub fn writer(&self, name: &str) -> Option<&Arc<dyn WriteCallback<V>>> {
        self.writers.get(name)
    }

    /// Looks up an evict callback.
    pub fn evicter(&self, name: &str) -> Option<&Arc<dyn EvictCallback>> {
        self.evicters.get(name)
    }

    /// Names of all registered callbacks, in registration order per namespace.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.readers
            .keys()
            .chain(self.writers.keys())
            .chain(self.evicters.keys())
            .map(String::as_str)
    }
}
