//! Read and write strategies, each carrying the callbacks it needs.
//!
//! A [`Policy`](crate::Policy) holds exactly one [`ReadStrategy`] and one
//! [`WriteStrategy`]. The cache-only variants carry nothing, the others carry
//! their callbacks, so a strategy can never be selected without them.

mod read;
mod write;

use std::fmt;
use std::sync::Arc;

use extensor_core::{EvictCallback, ReadCallback, WriteCallback};

use crate::policy::{ReadMode, WriteMode};

pub(crate) use read::cache_only_read;
pub(crate) use write::mutate;
pub use write::WriteOp;

/// How a key is read, with the callback that loads it.
pub enum ReadStrategy<V> {
    /// Serve only what is in the store.
    CacheOnly,
    /// Serve from the store, load through the callback on a miss.
    ReadThrough(Arc<dyn ReadCallback<V>>),
    /// Load through the callback first, fall back to the store on failure.
    ReadAround(Arc<dyn ReadCallback<V>>),
}

impl<V> ReadStrategy<V> {
    /// Pairs `mode` with `callback`, or names the missing callback.
    pub(crate) fn from_mode(
        mode: ReadMode,
        callback: Option<Arc<dyn ReadCallback<V>>>,
    ) -> Result<Self, &'static str> {
        match (mode, callback) {
            (ReadMode::CacheOnly, _) => Ok(Self::CacheOnly),
            (ReadMode::ReadThrough, Some(callback)) => Ok(Self::ReadThrough(callback)),
            (ReadMode::ReadAround, Some(callback)) => Ok(Self::ReadAround(callback)),
            (_, None) => Err("read"),
        }
    }

    /// Mode of this strategy.
    pub fn mode(&self) -> ReadMode {
        match self {
            Self::CacheOnly => ReadMode::CacheOnly,
            Self::ReadThrough(_) => ReadMode::ReadThrough,
            Self::ReadAround(_) => ReadMode::ReadAround,
        }
    }
}

impl<V> Clone for ReadStrategy<V> {
    fn clone(&self) -> Self {
        match self {
            Self::CacheOnly => Self::CacheOnly,
            Self::ReadThrough(callback) => Self::ReadThrough(Arc::clone(callback)),
            Self::ReadAround(callback) => Self::ReadAround(Arc::clone(callback)),
        }
    }
}

impl<V> fmt::Debug for ReadStrategy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode().as_str())
    }
}

/// Callbacks of a write-through or write-back policy.
pub struct WriteCallbacks<V> {
    write: Arc<dyn WriteCallback<V>>,
    update: Option<Arc<dyn WriteCallback<V>>>,
    evict: Option<Arc<dyn EvictCallback>>,
}

impl<V> WriteCallbacks<V> {
    /// Callback run by `put`.
    pub fn write(&self) -> &Arc<dyn WriteCallback<V>> {
        &self.write
    }

    /// Callback run by `update`: the update callback if set, else the write callback.
    pub fn update(&self) -> &Arc<dyn WriteCallback<V>> {
        self.update.as_ref().unwrap_or(&self.write)
    }

    /// Callback run by `evict`, if any.
    pub fn evict(&self) -> Option<&Arc<dyn EvictCallback>> {
        self.evict.as_ref()
    }
}

impl<V> Clone for WriteCallbacks<V> {
    fn clone(&self) -> Self {
        Self {
            write: Arc::clone(&self.write),
            update: self.update.clone(),
            evict: self.evict.clone(),
        }
    }
}

/// How a key is written, updated and evicted, with the callbacks that mirror it.
pub enum WriteStrategy<V> {
    /// Mutate only the store.
    CacheOnly,
    /// Run the callback first, mutate the store only if it succeeds.
    WriteThrough(WriteCallbacks<V>),
    /// Mutate the store, then run the callback in the background with retries.
    WriteBack(WriteCallbacks<V>),
}

impl<V> WriteStrategy<V> {
    /// Pairs `mode` with the callbacks, or names the missing one.
    pub(crate) fn from_mode(
        mode: WriteMode,
        write: Option<Arc<dyn WriteCallback<V>>>,
        update: Option<Arc<dyn WriteCallback<V>>>,
        evict: Option<Arc<dyn EvictCallback>>,
    ) -> Result<Self, &'static str> {
        if mode == WriteMode::CacheOnly {
            return Ok(Self::CacheOnly);
        }
        let write = write.ok_or("write")?;
        let callbacks = WriteCallbacks {
            write,
            update,
            evict,
        };
        Ok(match mode {
            WriteMode::WriteThrough => Self::WriteThrough(callbacks),
            _ => Self::WriteBack(callbacks),
        })
    }

    /// Mode of this strategy.
    pub fn mode(&self) -> WriteMode {
        match self {
            Self::CacheOnly => WriteMode::CacheOnly,
            Self::WriteThrough(_) => WriteMode::WriteThrough,
            Self::WriteBack(_) => WriteMode::WriteBack,
        }
    }
}

impl<V> Clone for WriteStrategy<V> {
    fn clone(&self) -> Self {
        match self {
            Self::CacheOnly => Self::CacheOnly,
            Self::WriteThrough(callbacks) => Self::WriteThrough(callbacks.clone()),
            Self::WriteBack(callbacks) => Self::WriteBack(callbacks.clone()),
        }
    }
}

impl<V> fmt::Debug for WriteStrategy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode().as_str())
    }
}
