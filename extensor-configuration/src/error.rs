use extensor::CacheError;

/// Error raised while loading settings or building a cache from them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid YAML for [`CacheSettings`](crate::CacheSettings).
    #[error("invalid cache settings: {0}")]
    Yaml(String),

    /// A policy names a callback the [`CallbackSet`](crate::CallbackSet) does not hold.
    #[error("pattern `{pattern}` refers to unknown {kind} callback `{name}`")]
    UnknownCallback {
        /// Pattern of the policy naming the callback.
        pattern: String,
        /// Callback namespace: `read`, `write`, `update` or `evict`.
        kind: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// A resolved policy was rejected at registration.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
