#![warn(missing_docs)]
//! # extensor-core
//!
//! Core types for the Extensor caching middleware.
//!
//! Extensor routes every cache operation on a string key to a policy chosen by
//! matching the key against registered patterns such as `user/{id}/profile`.
//! This crate holds the pieces every other crate depends on:
//!
//! - [`Pattern`] compiles a placeholder pattern and captures parameters from keys
//! - [`KeyContext`] is what a successful match produces and what callbacks receive
//! - [`ReadCallback`], [`WriteCallback`] and [`EvictCallback`] are the seams to the
//!   system of record behind the cache
//! - [`CacheEntry`] wraps a stored value with its creation and expiry timestamps
//!
//! ## Example
//!
//! ```
//! use extensor_core::Pattern;
//!
//! let pattern = Pattern::compile("this/{verb}/a/test/{noun}").unwrap();
//! let ctx = pattern.capture("this/is/a/test/sentence").unwrap();
//!
//! assert_eq!(ctx.param("verb"), Some("is"));
//! assert_eq!(ctx.param("noun"), Some("sentence"));
//! ```

pub mod callback;
pub mod context;
pub mod pattern;
pub mod value;

pub use callback::{CallbackError, CallbackResult, EvictCallback, ReadCallback, WriteCallback};
pub use context::{KeyContext, KeyParams};
pub use pattern::{Pattern, PatternError};
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use value::CacheEntry;
