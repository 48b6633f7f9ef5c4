//! Metrics declaration and recording helpers.
//!
//! Every helper takes the matched pattern as a label (`"none"` for keys no
//! pattern matches) and compiles to nothing without the `metrics` feature.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of reads served from the store.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "extensor_cache_hit_total",
            "Total number of reads served from the store."
        );
        "extensor_cache_hit_total"
    };
    /// Track number of reads that missed the store.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "extensor_cache_miss_total",
            "Total number of reads that missed the store."
        );
        "extensor_cache_miss_total"
    };
    /// Track number of failed callbacks surfaced to callers.
    pub static ref CALLBACK_FAILURES: &'static str = {
        metrics::describe_counter!(
            "extensor_callback_failures_total",
            "Total number of read or write callbacks that failed in the caller's path."
        );
        "extensor_callback_failures_total"
    };
    /// Track number of read-around reads answered from the store after a callback failure.
    pub static ref READ_AROUND_FALLBACKS: &'static str = {
        metrics::describe_counter!(
            "extensor_read_around_fallback_total",
            "Total number of read-around reads served from the store after a callback failure."
        );
        "extensor_read_around_fallback_total"
    };
    /// Track number of write-back callback attempts.
    pub static ref WRITE_BACK_ATTEMPTS: &'static str = {
        metrics::describe_counter!(
            "extensor_write_back_attempts_total",
            "Total number of write-back callback attempts."
        );
        "extensor_write_back_attempts_total"
    };
    /// Track number of write-back tasks that gave up.
    pub static ref WRITE_BACK_EXHAUSTED: &'static str = {
        metrics::describe_counter!(
            "extensor_write_back_exhausted_total",
            "Total number of write-back tasks that failed every attempt."
        );
        "extensor_write_back_exhausted_total"
    };
    /// Gauge of write-back tasks still running.
    pub static ref WRITE_BACK_ACTIVE: &'static str = {
        metrics::describe_gauge!(
            "extensor_write_back_active",
            "Number of write-back tasks currently running."
        );
        "extensor_write_back_active"
    };
}

/// Record a read served from the store.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_hit(pattern: &str) {
    metrics::counter!(*CACHE_HIT_COUNTER, "pattern" => pattern.to_string()).increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_hit(_pattern: &str) {}

/// Record a read that missed the store.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_miss(pattern: &str) {
    metrics::counter!(*CACHE_MISS_COUNTER, "pattern" => pattern.to_string()).increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_miss(_pattern: &str) {}

/// Record a failed callback on the caller's path.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_callback_failure(pattern: &str, operation: &'static str) {
    metrics::counter!(
        *CALLBACK_FAILURES,
        "pattern" => pattern.to_string(),
        "operation" => operation
    )
    .increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_callback_failure(_pattern: &str, _operation: &'static str) {}

/// Record a read-around fallback to the store.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_read_around_fallback(pattern: &str) {
    metrics::counter!(*READ_AROUND_FALLBACKS, "pattern" => pattern.to_string()).increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_read_around_fallback(_pattern: &str) {}

/// Record one write-back attempt.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_write_back_attempt() {
    metrics::counter!(*WRITE_BACK_ATTEMPTS).increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_write_back_attempt() {}

/// Record a write-back task that failed every attempt.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_write_back_exhausted() {
    metrics::counter!(*WRITE_BACK_EXHAUSTED).increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_write_back_exhausted() {}

/// Adjust the number of running write-back tasks.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_write_back_active(delta: f64) {
    metrics::gauge!(*WRITE_BACK_ACTIVE).increment(delta);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_write_back_active(_delta: f64) {}
