//! Callbacks that record their invocations.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use extensor::{CallbackError, CallbackResult, KeyContext};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub key: String,
    pub value: Option<String>,
    /// Time since the recorder was created.
    pub at: Duration,
}

/// Shared log of callback invocations.
#[derive(Clone)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    start: Instant,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            start: Instant::now(),
        }
    }

    fn record(&self, ctx: &KeyContext, value: Option<String>) {
        self.calls.lock().unwrap().push(Call {
            key: ctx.key().to_string(),
            value,
            at: self.start.elapsed(),
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Gaps between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        self.calls()
            .windows(2)
            .map(|pair| pair[1].at - pair[0].at)
            .collect()
    }

    /// Write callback that records and then returns `result`.
    pub fn writer(
        &self,
        fail: bool,
    ) -> impl Fn(KeyContext, String) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = CallbackResult<()>> + Send>,
    > + Send
    + Sync
    + 'static {
        let recorder = self.clone();
        move |ctx: KeyContext, value: String| {
            recorder.record(&ctx, Some(value));
            Box::pin(async move {
                if fail {
                    Err::<(), CallbackError>("system of record unavailable".into())
                } else {
                    Ok(())
                }
            })
        }
    }

    /// Evict callback that records and then succeeds or fails.
    pub fn evicter(
        &self,
        fail: bool,
    ) -> impl Fn(KeyContext) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = CallbackResult<()>> + Send>,
    > + Send
    + Sync
    + 'static {
        let recorder = self.clone();
        move |ctx: KeyContext| {
            recorder.record(&ctx, None);
            Box::pin(async move {
                if fail {
                    Err::<(), CallbackError>("system of record unavailable".into())
                } else {
                    Ok(())
                }
            })
        }
    }

    /// Read callback that records and then returns `value` or fails.
    pub fn reader(
        &self,
        value: Option<&str>,
    ) -> impl Fn(KeyContext) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = CallbackResult<String>> + Send>,
    > + Send
    + Sync
    + 'static {
        let recorder = self.clone();
        let value = value.map(str::to_owned);
        move |ctx: KeyContext| {
            recorder.record(&ctx, None);
            let value = value.clone();
            Box::pin(async move {
                value.ok_or_else(|| CallbackError::from("system of record unavailable"))
            })
        }
    }
}
