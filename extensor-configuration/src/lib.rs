#![warn(missing_docs)]
//! YAML configuration for [`extensor`] caches.
//!
//! Policies are described in a settings document; their callbacks are referred
//! to by name and resolved against a [`CallbackSet`] built in code:
//!
//! ```
//! use extensor::{CallbackError, KeyContext};
//! use extensor_configuration::{CacheSettings, CallbackSet};
//! use extensor_moka::MokaBackend;
//!
//! let settings = CacheSettings::from_yaml(
//!     r#"
//! defaults:
//!   ttl: 10m
//! policies:
//!   - pattern: "user/{id}"
//!     ttl: 30s
//!     read: { strategy: ReadThrough, callback: load_user }
//! "#,
//! )
//! .unwrap();
//!
//! let callbacks = CallbackSet::<String>::new().read("load_user", |ctx: KeyContext| async move {
//!     Ok::<_, CallbackError>(format!("user {}", ctx.param("id").unwrap_or_default()))
//! });
//! let cache = settings
//!     .build_cache(MokaBackend::builder().max_entries(1_000).build(), &callbacks)
//!     .unwrap();
//! assert_eq!(cache.registry().len(), 1);
//! ```

mod callbacks;
mod error;
mod settings;

pub use callbacks::CallbackSet;
pub use error::ConfigError;
pub use settings::{CacheSettings, PolicySettings, ReadSettings, StoreSettings, WriteSettings};
