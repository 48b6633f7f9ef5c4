//! Stored values with expiration metadata.
//!
//! [`CacheEntry`] is what the reference store keeps for every key: the value,
//! the TTL it was written with, when it was written and when it stops being
//! readable. A TTL of zero means the entry never expires.
//!
//! An entry is logically absent as soon as `now >= expires_at`, even if the
//! store has not physically removed it yet. Stores check
//! [`CacheEntry::is_expired`] on read, so lazy and active removal give the same
//! answers and only differ in how long dead entries occupy memory.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// A cached value with its expiration metadata.
///
/// # Example
///
/// ```
/// use extensor_core::CacheEntry;
/// use std::time::Duration;
///
/// let entry = CacheEntry::new("profile", Duration::from_secs(60));
/// assert!(!entry.is_expired());
/// assert!(entry.expires_at().is_some());
///
/// let forever = CacheEntry::new("config", Duration::ZERO);
/// assert_eq!(forever.expires_at(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    ttl: Duration,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    /// Creates an entry written now, expiring after `ttl` (zero = never).
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::created_at(value, ttl, Utc::now())
    }

    /// Creates an entry as if it had been written at `created_at`.
    ///
    /// A TTL too large to represent as a timestamp is treated as "never expires".
    pub fn created_at(value: V, ttl: Duration, created_at: DateTime<Utc>) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            TimeDelta::from_std(ttl)
                .ok()
                .and_then(|delta| created_at.checked_add_signed(delta))
        };
        Self {
            value,
            ttl,
            created_at,
            expires_at,
        }
    }

    /// Returns a reference to the stored value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The TTL the entry was written with.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// When the entry was written.
    #[inline]
    pub fn created(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the entry stops being readable, or `None` if it never expires.
    #[inline]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` if the entry is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| now >= expires)
    }

    /// Returns `true` if the entry is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left until expiry.
    ///
    /// `None` for entries that never expire, `Duration::ZERO` for entries that
    /// already have.
    pub fn time_to_live(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            (expires - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO)
        })
    }

    /// Consumes the entry and returns the value.
    pub fn into_value(self) -> V {
        self.value
    }
}
