//! Detached execution of write-back tasks.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use smol_str::SmolStr;
use tokio::sync::watch;
use tracing::{Instrument, info_span};

use crate::metrics;

#[derive(Debug)]
struct SchedulerInner {
    tasks: DashMap<u64, SmolStr>,
    next_id: AtomicU64,
    active: watch::Sender<usize>,
}

/// Removes a task from the in-flight set when it ends, even by panic.
struct TaskGuard {
    inner: Arc<SchedulerInner>,
    id: u64,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.inner.tasks.remove(&self.id);
        self.inner.active.send_modify(|active| *active -= 1);
        metrics::record_write_back_active(-1.0);
    }
}

/// Spawns write-back work on tokio and tracks what is still running.
///
/// Tasks are detached: they cannot be cancelled and outlive the operation that
/// started them. Tracking exists for observability and orderly shutdown only.
#[derive(Clone, Debug)]
pub struct WriteBackScheduler {
    inner: Arc<SchedulerInner>,
}

impl WriteBackScheduler {
    /// Creates a scheduler with no tasks.
    pub fn new() -> Self {
        let (active, _) = watch::channel(0);
        Self {
            inner: Arc::new(SchedulerInner {
                tasks: DashMap::new(),
                next_id: AtomicU64::new(0),
                active,
            }),
        }
    }

    /// Runs `task` on a detached tokio task under an `extensor.write_back` span.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<F>(&self, key: &str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.tasks.insert(id, SmolStr::new(key));
        self.inner.active.send_modify(|active| *active += 1);
        metrics::record_write_back_active(1.0);

        let guard = TaskGuard {
            inner: Arc::clone(&self.inner),
            id,
        };
        let span = info_span!("extensor.write_back", key, task = id);

        tokio::spawn(
            async move {
                let _guard = guard;
                task.await;
            }
            .instrument(span),
        );
    }

    /// Number of tasks still running.
    pub fn in_flight(&self) -> usize {
        self.inner.tasks.len()
    }

    /// Keys whose write-back is still running, in no particular order.
    pub fn in_flight_keys(&self) -> Vec<SmolStr> {
        self.inner
            .tasks
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Waits until every task spawned so far, and any spawned meanwhile, has ended.
    pub async fn wait_idle(&self) {
        let mut active = self.inner.active.subscribe();
        // The sender lives in `inner`, so the channel cannot close here.
        let _ = active.wait_for(|count| *count == 0).await;
    }
}

impl Default for WriteBackScheduler {
    fn default() -> Self {
        Self::new()
    }
}
