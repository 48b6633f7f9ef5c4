#![warn(missing_docs)]
//! In-memory TTL store for Extensor, powered by [Moka](https://docs.rs/moka).
//!
//! [`MokaBackend`] is the default store shape for the cache: every value is kept
//! as an [`extensor_core::CacheEntry`] carrying its own expiry, so entries written
//! with different TTLs coexist in one store. Expired entries are never returned;
//! Moka removes them during its housekeeping.
//!
//! ```
//! use extensor_moka::MokaBackend;
//!
//! let bounded = MokaBackend::<String>::builder().max_entries(10_000).build();
//! let unbounded = MokaBackend::<String>::builder().unbounded().build();
//! ```

mod backend;
mod builder;
pub mod metrics;

pub use backend::MokaBackend;
pub use builder::{EntryCapacity, MokaBackendBuilder, NoCapacity, Unbounded};
pub use moka::policy::EvictionPolicy;
