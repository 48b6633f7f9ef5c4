use std::sync::Arc;
use std::time::Duration;

use extensor_backend::Backend;
use extensor_core::{CallbackResult, EvictCallback, KeyContext, WriteCallback};
use tracing::debug;

use super::{WriteCallbacks, WriteStrategy};
use crate::error::CacheError;
use crate::metrics;
use crate::offload::{WriteBackScheduler, retry};
use crate::registry::Route;

/// A mutating cache operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp<V> {
    /// `put(key, value)`.
    Put(V),
    /// `update(key, value)`.
    Update(V),
    /// `evict(key)`.
    Evict,
}

impl<V> WriteOp<V> {
    /// Operation name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Put(_) => "put",
            Self::Update(_) => "update",
            Self::Evict => "evict",
        }
    }
}

/// Callback owed to the system of record by one operation.
enum Effect<V> {
    Write {
        callback: Arc<dyn WriteCallback<V>>,
        value: V,
    },
    Evict(Arc<dyn EvictCallback>),
}

impl<V> Effect<V> {
    async fn run(&self, ctx: &KeyContext) -> CallbackResult<()> {
        match self {
            Self::Write { callback, value } => callback.write(ctx, value).await,
            Self::Evict(callback) => callback.evict(ctx).await,
        }
    }
}

impl<V: Clone> WriteCallbacks<V> {
    fn effect(&self, op: &WriteOp<V>) -> Option<Effect<V>> {
        match op {
            WriteOp::Put(value) => Some(Effect::Write {
                callback: Arc::clone(self.write()),
                value: value.clone(),
            }),
            WriteOp::Update(value) => Some(Effect::Write {
                callback: Arc::clone(self.update()),
                value: value.clone(),
            }),
            WriteOp::Evict => self.evict().cloned().map(Effect::Evict),
        }
    }
}

impl<V> WriteStrategy<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Applies `op` to the routed key following this strategy.
    pub(crate) async fn execute<B>(
        &self,
        op: WriteOp<V>,
        route: &Route<'_, V>,
        backend: &B,
        scheduler: &WriteBackScheduler,
    ) -> Result<(), CacheError>
    where
        B: Backend<V>,
    {
        let key = route.key();
        let expiry = route.policy().expiry();

        match self {
            Self::CacheOnly => mutate(backend, key, op, expiry).await,
            Self::WriteThrough(callbacks) => {
                if let Some(effect) = callbacks.effect(&op) {
                    effect.run(route.context()).await.map_err(|error| {
                        metrics::record_callback_failure(
                            route.policy().pattern().as_str(),
                            op.name(),
                        );
                        CacheError::Callback(error)
                    })?;
                }
                mutate(backend, key, op, expiry).await
            }
            Self::WriteBack(callbacks) => {
                let effect = callbacks.effect(&op);
                mutate(backend, key, op, expiry).await?;

                if let Some(effect) = effect {
                    let ctx = route.context().clone();
                    let policy = *route.policy().retry();
                    debug!(
                        attempts = policy.attempts(),
                        "dispatching write-back callback"
                    );
                    scheduler.spawn(key, async move {
                        retry(&policy, |_attempt| effect.run(&ctx)).await;
                    });
                }
                Ok(())
            }
        }
    }
}

/// Applies `op` to the store.
pub(crate) async fn mutate<V, B>(
    backend: &B,
    key: &str,
    op: WriteOp<V>,
    expiry: Option<Duration>,
) -> Result<(), CacheError>
where
    V: Send + 'static,
    B: Backend<V>,
{
    match op {
        WriteOp::Put(value) | WriteOp::Update(value) => backend.write(key, value, expiry).await?,
        WriteOp::Evict => {
            let status = backend.remove(key).await?;
            debug!(?status, "entry removed");
        }
    }
    Ok(())
}
