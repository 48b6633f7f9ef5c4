use extensor_backend::BackendError;
use extensor_core::{CallbackError, PatternError};
use smol_str::SmolStr;

/// Error returned by [`Cache`](crate::Cache) operations and policy registration.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The key pattern of a policy could not be compiled.
    #[error("invalid key pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    /// A policy selects a strategy that needs a callback it does not carry.
    #[error("pattern `{pattern}` uses {strategy} but has no {callback} callback")]
    MissingCallback {
        /// Source text of the offending pattern.
        pattern: SmolStr,
        /// Strategy that needs the callback.
        strategy: &'static str,
        /// Which callback is missing.
        callback: &'static str,
    },

    /// A cache-only read found nothing for the key.
    #[error("key `{0}` not found")]
    KeyNotFound(String),

    /// A through-strategy callback failed; the error is passed on unchanged.
    #[error(transparent)]
    Callback(CallbackError),

    /// A read-around callback failed and the key was not cached either.
    #[error(
        "read callback for key `{key}` failed due to {source}; the key was not found in the cache"
    )]
    ReadAround {
        /// Key being read.
        key: String,
        /// Error returned by the read callback.
        source: CallbackError,
    },

    /// The backing store failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
