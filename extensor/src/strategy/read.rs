use extensor_backend::Backend;
use tracing::{debug, info};

use super::ReadStrategy;
use crate::error::CacheError;
use crate::metrics;
use crate::registry::Route;

impl<V> ReadStrategy<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Reads the routed key following this strategy.
    pub(crate) async fn execute<B>(&self, route: &Route<'_, V>, backend: &B) -> Result<V, CacheError>
    where
        B: Backend<V>,
    {
        let key = route.key();
        let pattern = route.policy().pattern().as_str();

        match self {
            Self::CacheOnly => cache_only_read(backend, key, pattern).await,
            Self::ReadThrough(callback) => {
                if let Some(value) = backend.read(key).await? {
                    debug!("cache hit");
                    metrics::record_hit(pattern);
                    return Ok(value);
                }
                debug!("cache miss, reading through");
                metrics::record_miss(pattern);

                let value = callback.read(route.context()).await.map_err(|error| {
                    metrics::record_callback_failure(pattern, "read");
                    CacheError::Callback(error)
                })?;
                backend
                    .write(key, value.clone(), route.policy().expiry())
                    .await?;
                Ok(value)
            }
            Self::ReadAround(callback) => match callback.read(route.context()).await {
                Ok(value) => {
                    backend
                        .write(key, value.clone(), route.policy().expiry())
                        .await?;
                    Ok(value)
                }
                Err(source) => {
                    metrics::record_callback_failure(pattern, "read");
                    match backend.read(key).await? {
                        Some(value) => {
                            info!(
                                error = %source,
                                "read callback for key {key} failed, reverting to cached value"
                            );
                            metrics::record_read_around_fallback(pattern);
                            Ok(value)
                        }
                        None => Err(CacheError::ReadAround {
                            key: key.to_owned(),
                            source,
                        }),
                    }
                }
            },
        }
    }
}

/// Serves `key` from the store only.
pub(crate) async fn cache_only_read<V, B>(
    backend: &B,
    key: &str,
    pattern: &str,
) -> Result<V, CacheError>
where
    V: Send + 'static,
    B: Backend<V>,
{
    match backend.read(key).await? {
        Some(value) => {
            debug!("cache hit");
            metrics::record_hit(pattern);
            Ok(value)
        }
        None => {
            debug!("cache miss");
            metrics::record_miss(pattern);
            Err(CacheError::KeyNotFound(key.to_owned()))
        }
    }
}
