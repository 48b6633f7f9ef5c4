#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// The [`Cache`] facade and its builder.
pub mod cache;

/// Error types for cache operations.
///
/// Defines [`CacheError`] which covers:
/// - Invalid patterns and policies missing a callback (registration)
/// - Callback failures on through-strategies
/// - Cache-only and read-around misses
/// - Backend errors
pub mod error;

/// Metrics collection for cache observability.
///
/// When the `metrics` feature is enabled, this module provides counters for
/// hits, misses, callback failures, read-around fallbacks and write-back
/// attempts, plus a gauge of running write-back tasks.
pub mod metrics;

/// Background execution of write-back callbacks.
pub mod offload;

/// Policy configuration: [`GlobalConfig`] defaults, [`KeyPolicy`] overrides and
/// the merged [`Policy`].
pub mod policy;

/// Ordered policy registry and key routing.
pub mod registry;

/// Read and write strategies.
pub mod strategy;

pub use cache::{Cache, CacheBuilder, NotSet};
pub use error::CacheError;
pub use policy::{
    GlobalConfig, KeyPolicy, Policy, ReadMode, RetryOverrides, RetryPolicy, WriteMode,
};
pub use registry::{PolicyRegistry, Route};
pub use strategy::{ReadStrategy, WriteCallbacks, WriteStrategy};

pub use extensor_backend::{Backend, BackendError, BackendResult, DeleteStatus};
pub use extensor_core::{
    CallbackError, CallbackResult, EvictCallback, KeyContext, KeyParams, Pattern, PatternError,
    ReadCallback, WriteCallback,
};

/// The `extensor` prelude.
///
/// ```rust
/// use extensor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Backend, Cache, CacheError, CallbackError, CallbackResult, GlobalConfig, KeyContext,
        KeyPolicy, ReadMode, WriteMode,
    };
}
