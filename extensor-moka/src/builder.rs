//! Builder for configuring [`MokaBackend`].

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use extensor_core::CacheEntry;
use moka::Expiry;
use moka::future::{Cache, CacheBuilder};
use moka::policy::EvictionPolicy;
use smol_str::SmolStr;

use crate::backend::MokaBackend;

/// Expiration policy that reads the TTL from each [`CacheEntry`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Expiration;

impl<V> Expiry<String, CacheEntry<V>> for Expiration {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.time_to_live()
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Moka's default keeps the old deadline; an overwrite must use the new entry's TTL.
        value.time_to_live()
    }
}

/// Marker type: capacity has not been configured yet.
///
/// This is the initial state of a [`MokaBackendBuilder`]. You must call either
/// [`max_entries()`](MokaBackendBuilder::max_entries) or
/// [`unbounded()`](MokaBackendBuilder::unbounded) before calling `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: entry-count capacity has been configured.
///
/// The store will hold at most `n` entries, evicting entries when the capacity
/// is exceeded.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Marker type: the store grows without bound; only TTLs and explicit removal shrink it.
#[derive(Debug, Clone, Copy)]
pub struct Unbounded;

/// Builder for creating and configuring a [`MokaBackend`].
///
/// Use [`MokaBackend::builder`] to create a new builder instance.
///
/// The capacity methods use the typestate pattern: `build()` is only available
/// after a capacity has been chosen.
pub struct MokaBackendBuilder<V, Cap> {
    capacity: Cap,
    label: SmolStr,
    eviction_policy: Option<EvictionPolicy>,
    _value: PhantomData<fn() -> V>,
}

impl<V> MokaBackendBuilder<V, NoCapacity> {
    /// Creates a new builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            label: SmolStr::new_static("moka"),
            eviction_policy: None,
            _value: PhantomData,
        }
    }

    /// Limits the store to `capacity` entries.
    pub fn max_entries(self, capacity: u64) -> MokaBackendBuilder<V, EntryCapacity> {
        MokaBackendBuilder {
            capacity: EntryCapacity(capacity),
            label: self.label,
            eviction_policy: self.eviction_policy,
            _value: PhantomData,
        }
    }

    /// Lets the store grow without a capacity limit.
    pub fn unbounded(self) -> MokaBackendBuilder<V, Unbounded> {
        MokaBackendBuilder {
            capacity: Unbounded,
            label: self.label,
            eviction_policy: self.eviction_policy,
            _value: PhantomData,
        }
    }
}

impl<V> Default for MokaBackendBuilder<V, NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, Cap> MokaBackendBuilder<V, Cap> {
    /// Sets a custom label for this backend.
    ///
    /// The label appears in logs and metrics.
    ///
    /// # Default
    ///
    /// `"moka"`
    pub fn label(mut self, label: impl Into<SmolStr>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the eviction policy used when a bounded store is full.
    ///
    /// # Default
    ///
    /// [`EvictionPolicy::tiny_lfu()`]
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }
}

impl<V> MokaBackendBuilder<V, EntryCapacity>
where
    V: Clone + Send + Sync + 'static,
{
    /// Builds the [`MokaBackend`] with entry-count based capacity.
    pub fn build(self) -> MokaBackend<V> {
        let policy = self
            .eviction_policy
            .unwrap_or_else(EvictionPolicy::tiny_lfu);
        let cache: Cache<String, CacheEntry<V>> = CacheBuilder::new(self.capacity.0)
            .eviction_policy(policy)
            .expire_after(Expiration)
            .build();

        MokaBackend {
            cache,
            label: self.label,
        }
    }
}

impl<V> MokaBackendBuilder<V, Unbounded>
where
    V: Clone + Send + Sync + 'static,
{
    /// Builds an unbounded [`MokaBackend`].
    pub fn build(self) -> MokaBackend<V> {
        let mut builder = CacheBuilder::default().expire_after(Expiration);
        if let Some(policy) = self.eviction_policy {
            builder = builder.eviction_policy(policy);
        }

        MokaBackend {
            cache: builder.build(),
            label: self.label,
        }
    }
}
