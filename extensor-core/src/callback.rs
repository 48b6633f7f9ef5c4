//! Callbacks to the system of record behind the cache.
//!
//! Each policy can carry up to four callbacks:
//!
//! - a [`ReadCallback`] that loads a value for a key (read-through, read-around)
//! - a [`WriteCallback`] used by `put`, and optionally a second one used by `update`
//! - an [`EvictCallback`] used by `evict`
//!
//! All of them receive the [`KeyContext`] of the matched key. Any async closure
//! with the right shape implements the traits, so most users never name them:
//!
//! ```
//! use extensor_core::{CallbackResult, KeyContext, ReadCallback};
//!
//! async fn load_user(ctx: KeyContext) -> CallbackResult<String> {
//!     Ok(format!("user #{}", ctx.param("id").unwrap_or_default()))
//! }
//!
//! fn assert_read_callback<C: ReadCallback<String>>(_: &C) {}
//! assert_read_callback(&load_user);
//! ```
//!
//! Errors are boxed so the cache can surface them to the caller unchanged.

use std::future::Future;

use async_trait::async_trait;

use crate::context::KeyContext;

/// Error produced by a user callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by user callbacks.
pub type CallbackResult<T> = Result<T, CallbackError>;

/// Loads the value for a key from the system of record.
#[async_trait]
pub trait ReadCallback<V>: Send + Sync {
    /// Fetches the value for the key described by `ctx`.
    async fn read(&self, ctx: &KeyContext) -> CallbackResult<V>;
}

/// Writes a value for a key to the system of record.
#[async_trait]
pub trait WriteCallback<V>: Send + Sync {
    /// Persists `value` for the key described by `ctx`.
    async fn write(&self, ctx: &KeyContext, value: &V) -> CallbackResult<()>;
}

/// Removes a key from the system of record.
#[async_trait]
pub trait EvictCallback: Send + Sync {
    /// Deletes the key described by `ctx`.
    async fn evict(&self, ctx: &KeyContext) -> CallbackResult<()>;
}

#[async_trait]
impl<V, F, Fut> ReadCallback<V> for F
where
    F: Fn(KeyContext) -> Fut + Send + Sync,
    Fut: Future<Output = CallbackResult<V>> + Send + 'static,
    V: Send + 'static,
{
    async fn read(&self, ctx: &KeyContext) -> CallbackResult<V> {
        (self)(ctx.clone()).await
    }
}

#[async_trait]
impl<V, F, Fut> WriteCallback<V> for F
where
    F: Fn(KeyContext, V) -> Fut + Send + Sync,
    Fut: Future<Output = CallbackResult<()>> + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn write(&self, ctx: &KeyContext, value: &V) -> CallbackResult<()> {
        (self)(ctx.clone(), value.clone()).await
    }
}

#[async_trait]
impl<F, Fut> EvictCallback for F
where
    F: Fn(KeyContext) -> Fut + Send + Sync,
    Fut: Future<Output = CallbackResult<()>> + Send + 'static,
{
    async fn evict(&self, ctx: &KeyContext) -> CallbackResult<()> {
        (self)(ctx.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_closure_as_read_callback() {
        let callback = |ctx: KeyContext| async move {
            Ok::<_, CallbackError>(ctx.param("id").unwrap_or_default().len())
        };
        let ctx = KeyContext::new("user/1234", [("id", "1234")].into_iter().collect());

        assert_eq!(ReadCallback::read(&callback, &ctx).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_closure_as_write_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let callback = move |_ctx: KeyContext, value: u32| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(value as usize, Ordering::SeqCst);
                Ok::<_, CallbackError>(())
            }
        };
        let ctx = KeyContext::literal("k");

        WriteCallback::write(&callback, &ctx, &3).await.unwrap();
        WriteCallback::write(&callback, &ctx, &4).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_closure_errors_are_preserved() {
        let callback =
            |_ctx: KeyContext| async move { Err::<(), CallbackError>("store offline".into()) };

        let err = EvictCallback::evict(&callback, &KeyContext::literal("k"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "store offline");
    }
}
