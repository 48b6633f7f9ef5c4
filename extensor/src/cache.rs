//! The cache facade routing every operation through its policy.

use std::fmt;

use extensor_backend::Backend;
use tracing::{Instrument, debug, debug_span};

use crate::error::CacheError;
use crate::offload::WriteBackScheduler;
use crate::policy::{GlobalConfig, KeyPolicy, expiry};
use crate::registry::{PolicyRegistry, Route};
use crate::strategy::{WriteOp, cache_only_read, mutate};

/// Metrics label for keys no pattern matches.
const UNMATCHED: &str = "none";

/// Caching middleware in front of a [`Backend`].
///
/// Each operation resolves its key against the registered policies, first
/// match wins, and runs the read or write strategy of that policy. Keys no
/// pattern matches are handled cache-only with the global TTL.
///
/// # Example
///
/// ```
/// use extensor::{Cache, CallbackError, KeyContext, KeyPolicy};
/// use extensor_moka::MokaBackend;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), extensor::CacheError> {
/// let mut cache = Cache::new(MokaBackend::<String>::builder().max_entries(1_000).build());
/// cache.register(
///     KeyPolicy::new("this/{verb}/a/test/{noun}").read_through(|ctx: KeyContext| async move {
///         Ok::<_, CallbackError>(format!(
///             "{} {}",
///             ctx.param("verb").unwrap_or_default(),
///             ctx.param("noun").unwrap_or_default()
///         ))
///     }),
/// )?;
///
/// assert_eq!(cache.get("this/is/a/test/string").await?, "is string");
/// assert!(cache.contains_key("this/is/a/test/string").await?);
/// # Ok(())
/// # }
/// ```
pub struct Cache<V, B> {
    registry: PolicyRegistry<V>,
    backend: B,
    scheduler: WriteBackScheduler,
}

impl<V, B> fmt::Debug for Cache<V, B>
where
    B: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("registry", &self.registry)
            .field("backend", &self.backend)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl<V> Cache<V, NotSet> {
    /// Creates a new [`CacheBuilder`].
    pub fn builder() -> CacheBuilder<V, NotSet> {
        CacheBuilder::new()
    }
}

impl<V, B> Cache<V, B>
where
    V: Clone + Send + Sync + 'static,
    B: Backend<V>,
{
    /// Creates a cache over `backend` with default settings and no policies.
    pub fn new(backend: B) -> Self {
        Self::with_defaults(backend, GlobalConfig::default())
    }

    /// Creates a cache over `backend` with the given defaults and no policies.
    pub fn with_defaults(backend: B, global: GlobalConfig) -> Self {
        Self {
            registry: PolicyRegistry::new(global),
            backend,
            scheduler: WriteBackScheduler::new(),
        }
    }

    /// Adds a policy after all previously registered ones.
    pub fn register(&mut self, key_policy: KeyPolicy<V>) -> Result<(), CacheError> {
        self.registry.register(key_policy)
    }

    /// Reads `key` following its read strategy.
    ///
    /// Keys without a policy, and policies reading cache-only, fail with
    /// [`CacheError::KeyNotFound`] when nothing is stored.
    pub async fn get(&self, key: &str) -> Result<V, CacheError> {
        let route = self.registry.resolve(key);
        let pattern = pattern_of(&route);
        let span = debug_span!("extensor.get", key, pattern);

        async {
            match &route {
                Some(route) => {
                    debug!(strategy = ?route.policy().read(), "routed");
                    route.policy().read().execute(route, &self.backend).await
                }
                None => {
                    debug!("no policy matched");
                    cache_only_read(&self.backend, key, UNMATCHED).await
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Stores `value` under `key` following its write strategy.
    pub async fn put(&self, key: &str, value: V) -> Result<(), CacheError> {
        self.write(key, WriteOp::Put(value)).await
    }

    /// Replaces the value under `key`, running the update callback if set.
    pub async fn update(&self, key: &str, value: V) -> Result<(), CacheError> {
        self.write(key, WriteOp::Update(value)).await
    }

    /// Removes `key`, running the evict callback if set.
    pub async fn evict(&self, key: &str) -> Result<(), CacheError> {
        self.write(key, WriteOp::Evict).await
    }

    /// Removes every entry from the store without running callbacks.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.backend.clear().await?;
        Ok(())
    }

    /// Returns `true` if a live entry is stored for `key`.
    pub async fn contains_key(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.backend.read(key).await?.is_some())
    }

    /// Number of entries in the store.
    pub async fn size(&self) -> Result<u64, CacheError> {
        Ok(self.backend.size().await?)
    }

    /// Registered policies.
    pub fn registry(&self) -> &PolicyRegistry<V> {
        &self.registry
    }

    /// The underlying store.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Scheduler running write-back callbacks.
    pub fn scheduler(&self) -> &WriteBackScheduler {
        &self.scheduler
    }

    async fn write(&self, key: &str, op: WriteOp<V>) -> Result<(), CacheError> {
        let route = self.registry.resolve(key);
        let pattern = pattern_of(&route);
        let span = match op {
            WriteOp::Put(_) => debug_span!("extensor.put", key, pattern),
            WriteOp::Update(_) => debug_span!("extensor.update", key, pattern),
            WriteOp::Evict => debug_span!("extensor.evict", key, pattern),
        };

        async {
            match &route {
                Some(route) => {
                    debug!(strategy = ?route.policy().write(), "routed");
                    route
                        .policy()
                        .write()
                        .execute(op, route, &self.backend, &self.scheduler)
                        .await
                }
                None => {
                    debug!("no policy matched");
                    let ttl = expiry(self.registry.global().ttl);
                    mutate(&self.backend, key, op, ttl).await
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn pattern_of<'a, V>(route: &'a Option<Route<'_, V>>) -> Option<&'a str> {
    route.as_ref().map(|route| route.policy().pattern().as_str())
}

/// Marker type for unset builder fields.
///
/// When you see `NotSet` in a compiler error, it means you haven't called
/// the corresponding builder method yet.
#[derive(Debug, Clone, Copy)]
pub struct NotSet;

/// Builder for [`Cache`].
///
/// Use [`Cache::builder()`] to create a new builder. `build()` is available
/// once a backend is set; it registers the queued policies in order.
pub struct CacheBuilder<V, B> {
    backend: B,
    global: GlobalConfig,
    policies: Vec<KeyPolicy<V>>,
}

impl<V> CacheBuilder<V, NotSet> {
    /// Creates a new builder with no backend set.
    pub fn new() -> Self {
        Self {
            backend: NotSet,
            global: GlobalConfig::default(),
            policies: Vec::new(),
        }
    }
}

impl<V> Default for CacheBuilder<V, NotSet> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, B> CacheBuilder<V, B> {
    /// Sets the backing store.
    pub fn backend<NewB>(self, backend: NewB) -> CacheBuilder<V, NewB> {
        CacheBuilder {
            backend,
            global: self.global,
            policies: self.policies,
        }
    }

    /// Sets the defaults merged under every policy.
    pub fn defaults(self, global: GlobalConfig) -> Self {
        Self { global, ..self }
    }

    /// Queues a policy; policies are registered in the order they are added.
    pub fn policy(mut self, key_policy: KeyPolicy<V>) -> Self {
        self.policies.push(key_policy);
        self
    }
}

impl<V, B> CacheBuilder<V, B>
where
    V: Clone + Send + Sync + 'static,
    B: Backend<V>,
{
    /// Builds the [`Cache`], registering every queued policy.
    pub fn build(self) -> Result<Cache<V, B>, CacheError> {
        let mut cache = Cache::with_defaults(self.backend, self.global);
        for key_policy in self.policies {
            cache.register(key_policy)?;
        }
        Ok(cache)
    }
}
