use std::sync::Arc;
use std::time::Duration;

use extensor::{Backend, Cache, GlobalConfig, KeyPolicy, ReadMode, RetryOverrides, WriteMode};
use serde::{Deserialize, Serialize};

use crate::callbacks::CallbackSet;
use crate::error::ConfigError;

/// Read section of a policy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct ReadSettings {
    /// Read mode; inherits `defaults.read` when absent.
    #[serde(default)]
    pub strategy: Option<ReadMode>,
    /// Name of the read callback.
    #[serde(default)]
    pub callback: Option<String>,
}

/// Write section of a policy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct WriteSettings {
    /// Write mode; inherits `defaults.write` when absent.
    #[serde(default)]
    pub strategy: Option<WriteMode>,
    /// Name of the write callback used by `put`.
    #[serde(default)]
    pub callback: Option<String>,
    /// Name of the write callback used by `update`.
    #[serde(default)]
    pub update: Option<String>,
    /// Name of the evict callback.
    #[serde(default)]
    pub evict: Option<String>,
}

/// One entry of the `policies` list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PolicySettings {
    /// Key pattern with `{name}` placeholders.
    pub pattern: String,
    /// Entry lifetime (e.g. "30s"); inherits `defaults.ttl` when absent.
    #[serde(default, with = "humantime_serde")]
    pub ttl: Option<Duration>,
    /// Read strategy and callback.
    #[serde(default)]
    pub read: ReadSettings,
    /// Write strategy and callbacks.
    #[serde(default)]
    pub write: WriteSettings,
    /// Retry overrides for write-back.
    #[serde(default)]
    pub retry: RetryOverrides,
}

impl PolicySettings {
    /// Resolves callback names and builds the [`KeyPolicy`].
    pub fn into_key_policy<V>(self, callbacks: &CallbackSet<V>) -> Result<KeyPolicy<V>, ConfigError>
    where
        V: Clone + Send + Sync + 'static,
    {
        let Self {
            pattern,
            ttl,
            read,
            write,
            retry,
        } = self;

        let unknown = |kind: &'static str, name: &str| ConfigError::UnknownCallback {
            pattern: pattern.clone(),
            kind,
            name: name.to_owned(),
        };

        let mut policy = KeyPolicy::new(pattern.as_str()).retry(retry);
        if let Some(ttl) = ttl {
            policy = policy.ttl(ttl);
        }

        if let Some(mode) = read.strategy {
            policy = policy.read_mode(mode);
        }
        if let Some(name) = read.callback.as_deref() {
            let callback = callbacks.reader(name).ok_or_else(|| unknown("read", name))?;
            policy = policy.read_callback(Arc::clone(callback));
        }

        if let Some(mode) = write.strategy {
            policy = policy.write_mode(mode);
        }
        if let Some(name) = write.callback.as_deref() {
            let callback = callbacks.writer(name).ok_or_else(|| unknown("write", name))?;
            policy = policy.write_callback(Arc::clone(callback));
        }
        if let Some(name) = write.update.as_deref() {
            let callback = callbacks
                .writer(name)
                .ok_or_else(|| unknown("update", name))?;
            policy = policy.update_callback(Arc::clone(callback));
        }
        if let Some(name) = write.evict.as_deref() {
            let callback = callbacks
                .evicter(name)
                .ok_or_else(|| unknown("evict", name))?;
            policy = policy.evict_callback(Arc::clone(callback));
        }

        Ok(policy)
    }
}

/// In-memory store section, used by `build_moka_cache`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct StoreSettings {
    /// Maximum number of entries; unbounded when absent.
    #[serde(default)]
    pub max_entries: Option<u64>,
    /// Optional label for this store (used in metrics).
    #[serde(default)]
    pub label: Option<String>,
}

/// A complete cache settings document.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct CacheSettings {
    /// Defaults merged under every policy.
    #[serde(default)]
    pub defaults: GlobalConfig,
    /// Policies in match order.
    #[serde(default)]
    pub policies: Vec<PolicySettings>,
    /// In-memory store settings.
    #[serde(default)]
    pub store: StoreSettings,
}

impl CacheSettings {
    /// Parses a YAML settings document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(yaml).map_err(|error| ConfigError::Yaml(error.to_string()))
    }

    /// Builds a cache over `backend`, registering the policies in document order.
    pub fn build_cache<V, B>(
        &self,
        backend: B,
        callbacks: &CallbackSet<V>,
    ) -> Result<Cache<V, B>, ConfigError>
    where
        V: Clone + Send + Sync + 'static,
        B: Backend<V>,
    {
        let mut cache = Cache::with_defaults(backend, self.defaults);
        for policy in &self.policies {
            cache.register(policy.clone().into_key_policy(callbacks)?)?;
        }
        Ok(cache)
    }

    /// Builds a cache over a [`MokaBackend`](extensor_moka::MokaBackend) configured
    /// from the `store` section.
    #[cfg(feature = "moka")]
    pub fn build_moka_cache<V>(
        &self,
        callbacks: &CallbackSet<V>,
    ) -> Result<Cache<V, extensor_moka::MokaBackend<V>>, ConfigError>
    where
        V: Clone + Send + Sync + 'static,
    {
        use extensor_moka::MokaBackend;

        let mut builder = MokaBackend::builder();
        if let Some(label) = &self.store.label {
            builder = builder.label(label.as_str());
        }
        let backend = match self.store.max_entries {
            Some(max_entries) => builder.max_entries(max_entries).build(),
            None => builder.unbounded().build(),
        };
        self.build_cache(backend, callbacks)
    }
}
