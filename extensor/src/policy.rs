//! Caching policies: global defaults, per-pattern overrides and their merge.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use extensor_core::{
    CallbackResult, EvictCallback, KeyContext, Pattern, ReadCallback, WriteCallback,
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::CacheError;
use crate::strategy::{ReadStrategy, WriteStrategy};

/// How a key is read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub enum ReadMode {
    /// Serve only what is in the store.
    #[default]
    CacheOnly,
    /// Serve from the store, load through the read callback on a miss.
    ReadThrough,
    /// Load through the read callback first, fall back to the store on failure.
    ReadAround,
}

impl ReadMode {
    /// Returns the mode name as written in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadMode::CacheOnly => "CacheOnly",
            ReadMode::ReadThrough => "ReadThrough",
            ReadMode::ReadAround => "ReadAround",
        }
    }
}

/// How a key is written, updated and evicted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub enum WriteMode {
    /// Mutate only the store.
    #[default]
    CacheOnly,
    /// Run the callback first, mutate the store only if it succeeds.
    WriteThrough,
    /// Mutate the store, then run the callback in the background with retries.
    WriteBack,
}

impl WriteMode {
    /// Returns the mode name as written in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::CacheOnly => "CacheOnly",
            WriteMode::WriteThrough => "WriteThrough",
            WriteMode::WriteBack => "WriteBack",
        }
    }
}

/// Retry schedule for write-back callbacks.
///
/// A failing callback is attempted `count + 1` times in total. After failed
/// attempt `i` (starting at zero) the scheduler waits [`delay(i)`](Self::delay).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub count: u32,
    /// Base wait between attempts (e.g. "500ms", "1s").
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Double the wait after every failed attempt.
    pub backoff: bool,
    /// Upper bound for a single wait.
    #[serde(with = "humantime_serde")]
    pub interval_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            count: 1,
            interval: Duration::from_millis(1000),
            backoff: true,
            interval_cap: Duration::from_secs(60 * 60),
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts, including the first one.
    pub fn attempts(&self) -> u32 {
        self.count.saturating_add(1)
    }

    /// Wait after failed attempt `attempt` (zero based), capped at `interval_cap`.
    ///
    /// ```
    /// use std::time::Duration;
    /// use extensor::RetryPolicy;
    ///
    /// let retry = RetryPolicy {
    ///     count: 3,
    ///     interval: Duration::from_millis(100),
    ///     backoff: true,
    ///     interval_cap: Duration::from_millis(200),
    /// };
    /// assert_eq!(retry.delay(0), Duration::from_millis(100));
    /// assert_eq!(retry.delay(1), Duration::from_millis(200));
    /// assert_eq!(retry.delay(2), Duration::from_millis(200));
    /// ```
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = if self.backoff {
            2u32.checked_pow(attempt).unwrap_or(u32::MAX)
        } else {
            1
        };
        self.interval
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.interval_cap)
    }
}

/// Per-pattern retry overrides; unset fields fall back to [`GlobalConfig::retry`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct RetryOverrides {
    /// Overrides [`RetryPolicy::count`].
    #[serde(default)]
    pub count: Option<u32>,
    /// Overrides [`RetryPolicy::interval`].
    #[serde(default, with = "humantime_serde")]
    pub interval: Option<Duration>,
    /// Overrides [`RetryPolicy::backoff`].
    #[serde(default)]
    pub backoff: Option<bool>,
    /// Overrides [`RetryPolicy::interval_cap`].
    #[serde(default, with = "humantime_serde")]
    pub interval_cap: Option<Duration>,
}

impl RetryOverrides {
    /// Applies the set fields on top of `base`.
    pub fn apply(&self, base: &RetryPolicy) -> RetryPolicy {
        RetryPolicy {
            count: self.count.unwrap_or(base.count),
            interval: self.interval.unwrap_or(base.interval),
            backoff: self.backoff.unwrap_or(base.backoff),
            interval_cap: self.interval_cap.unwrap_or(base.interval_cap),
        }
    }
}

/// Defaults applied to every registered policy and to keys no pattern matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Entry lifetime (e.g. "10m"); zero means entries never expire.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Default read mode.
    pub read: ReadMode,
    /// Default write mode.
    pub write: WriteMode,
    /// Default write-back retry schedule.
    pub retry: RetryPolicy,
}

/// Policy for the keys matching one pattern, before defaults are applied.
///
/// Every field except the pattern is optional; [`Policy::merge`] fills the gaps
/// from [`GlobalConfig`].
///
/// ```
/// use std::time::Duration;
/// use extensor::{CallbackError, KeyContext, KeyPolicy};
///
/// let policy = KeyPolicy::<String>::new("user/{id}")
///     .ttl(Duration::from_secs(30))
///     .read_through(|ctx: KeyContext| async move {
///         Ok::<_, CallbackError>(format!("user {}", ctx.param("id").unwrap_or_default()))
///     })
///     .retry_count(3);
/// ```
pub struct KeyPolicy<V> {
    pattern: SmolStr,
    ttl: Option<Duration>,
    read: Option<ReadMode>,
    write: Option<WriteMode>,
    read_callback: Option<Arc<dyn ReadCallback<V>>>,
    write_callback: Option<Arc<dyn WriteCallback<V>>>,
    update_callback: Option<Arc<dyn WriteCallback<V>>>,
    evict_callback: Option<Arc<dyn EvictCallback>>,
    retry: RetryOverrides,
}

impl<V> fmt::Debug for KeyPolicy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPolicy")
            .field("pattern", &self.pattern)
            .field("ttl", &self.ttl)
            .field("read", &self.read)
            .field("write", &self.write)
            .field("read_callback", &self.read_callback.is_some())
            .field("write_callback", &self.write_callback.is_some())
            .field("update_callback", &self.update_callback.is_some())
            .field("evict_callback", &self.evict_callback.is_some())
            .field("retry", &self.retry)
            .finish()
    }
}

impl<V> KeyPolicy<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Starts a policy for keys matching `pattern`.
    pub fn new(pattern: impl Into<SmolStr>) -> Self {
        Self {
            pattern: pattern.into(),
            ttl: None,
            read: None,
            write: None,
            read_callback: None,
            write_callback: None,
            update_callback: None,
            evict_callback: None,
            retry: RetryOverrides::default(),
        }
    }

    /// Returns the pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Sets the entry lifetime; zero means entries never expire.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the read mode without touching the read callback.
    pub fn read_mode(mut self, mode: ReadMode) -> Self {
        self.read = Some(mode);
        self
    }

    /// Sets the write mode without touching the write callbacks.
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write = Some(mode);
        self
    }

    /// Sets the read callback.
    pub fn read_callback(mut self, callback: Arc<dyn ReadCallback<V>>) -> Self {
        self.read_callback = Some(callback);
        self
    }

    /// Sets the callback used by `put`, and by `update` when no update callback is set.
    pub fn write_callback(mut self, callback: Arc<dyn WriteCallback<V>>) -> Self {
        self.write_callback = Some(callback);
        self
    }

    /// Sets the callback used by `update`.
    pub fn update_callback(mut self, callback: Arc<dyn WriteCallback<V>>) -> Self {
        self.update_callback = Some(callback);
        self
    }

    /// Sets the callback used by `evict`.
    pub fn evict_callback(mut self, callback: Arc<dyn EvictCallback>) -> Self {
        self.evict_callback = Some(callback);
        self
    }

    /// Reads through `callback` on a cache miss.
    pub fn read_through<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(KeyContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<V>> + Send + 'static,
    {
        self.read_mode(ReadMode::ReadThrough)
            .read_callback(Arc::new(callback))
    }

    /// Reads from `callback` first and falls back to the store when it fails.
    pub fn read_around<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(KeyContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<V>> + Send + 'static,
    {
        self.read_mode(ReadMode::ReadAround)
            .read_callback(Arc::new(callback))
    }

    /// Writes through `callback` before the store is mutated.
    pub fn write_through<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(KeyContext, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<()>> + Send + 'static,
    {
        self.write_mode(WriteMode::WriteThrough)
            .write_callback(Arc::new(callback))
    }

    /// Mutates the store first and runs `callback` in the background with retries.
    pub fn write_back<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(KeyContext, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<()>> + Send + 'static,
    {
        self.write_mode(WriteMode::WriteBack)
            .write_callback(Arc::new(callback))
    }

    /// Uses `callback` for `update` instead of the write callback.
    pub fn on_update<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(KeyContext, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<()>> + Send + 'static,
    {
        self.update_callback(Arc::new(callback))
    }

    /// Runs `callback` on `evict`, following the write mode.
    pub fn on_evict<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(KeyContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<()>> + Send + 'static,
    {
        self.evict_callback(Arc::new(callback))
    }

    /// Replaces all retry overrides at once.
    pub fn retry(mut self, retry: RetryOverrides) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the number of write-back retries after the first attempt.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry.count = Some(count);
        self
    }

    /// Sets the base wait between write-back attempts.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry.interval = Some(interval);
        self
    }

    /// Enables or disables exponential backoff between attempts.
    pub fn backoff(mut self, enabled: bool) -> Self {
        self.retry.backoff = Some(enabled);
        self
    }

    /// Sets the upper bound for a single wait between attempts.
    pub fn interval_cap(mut self, cap: Duration) -> Self {
        self.retry.interval_cap = Some(cap);
        self
    }
}

/// Fully resolved policy for one pattern.
pub struct Policy<V> {
    pattern: Pattern,
    ttl: Duration,
    read: ReadStrategy<V>,
    write: WriteStrategy<V>,
    retry: RetryPolicy,
}

impl<V> fmt::Debug for Policy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("pattern", &self.pattern.as_str())
            .field("ttl", &self.ttl)
            .field("read", &self.read)
            .field("write", &self.write)
            .field("retry", &self.retry)
            .finish()
    }
}

impl<V> Policy<V> {
    /// Compiles the pattern of `key_policy` and fills unset fields from `global`.
    ///
    /// Fails when the pattern is invalid or when the resulting read or write mode
    /// needs a callback the key policy does not carry.
    pub fn merge(key_policy: KeyPolicy<V>, global: &GlobalConfig) -> Result<Self, CacheError> {
        let KeyPolicy {
            pattern,
            ttl,
            read,
            write,
            read_callback,
            write_callback,
            update_callback,
            evict_callback,
            retry,
        } = key_policy;

        let pattern = Pattern::compile(&pattern)?;
        let read_mode = read.unwrap_or(global.read);
        let read = ReadStrategy::from_mode(read_mode, read_callback)
            .map_err(|callback| missing(&pattern, read_mode.as_str(), callback))?;
        let write_mode = write.unwrap_or(global.write);
        let write = WriteStrategy::from_mode(
            write_mode,
            write_callback,
            update_callback,
            evict_callback,
        )
        .map_err(|callback| missing(&pattern, write_mode.as_str(), callback))?;

        Ok(Self {
            pattern,
            ttl: ttl.unwrap_or(global.ttl),
            read,
            write,
            retry: retry.apply(&global.retry),
        })
    }

    /// Compiled key pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Entry lifetime; zero means entries never expire.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Lifetime handed to the store, `None` when entries never expire.
    pub fn expiry(&self) -> Option<Duration> {
        expiry(self.ttl)
    }

    /// Read strategy with its callback.
    pub fn read(&self) -> &ReadStrategy<V> {
        &self.read
    }

    /// Write strategy with its callbacks.
    pub fn write(&self) -> &WriteStrategy<V> {
        &self.write
    }

    /// Write-back retry schedule.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

pub(crate) fn expiry(ttl: Duration) -> Option<Duration> {
    (!ttl.is_zero()).then_some(ttl)
}

fn missing(pattern: &Pattern, strategy: &'static str, callback: &'static str) -> CacheError {
    CacheError::MissingCallback {
        pattern: SmolStr::new(pattern.as_str()),
        strategy,
        callback,
    }
}
