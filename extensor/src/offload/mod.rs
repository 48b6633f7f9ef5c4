//! Background execution of write-back callbacks.
//!
//! A write-back operation mutates the store, then hands its callback to the
//! [`WriteBackScheduler`], which runs it on a detached tokio task through
//! [`retry`] until it succeeds or the [`RetryPolicy`](crate::RetryPolicy) is
//! exhausted. The caller never observes the outcome.
//!
//! ```
//! use std::time::Duration;
//! use extensor::RetryPolicy;
//! use extensor::offload::{RetryOutcome, WriteBackScheduler, retry};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let scheduler = WriteBackScheduler::new();
//! let policy = RetryPolicy { count: 0, ..RetryPolicy::default() };
//! scheduler.spawn("user/1", async move {
//!     let outcome = retry(&policy, |_attempt| async { Ok::<_, extensor::CallbackError>(()) }).await;
//!     assert_eq!(outcome, RetryOutcome::Succeeded { attempts: 1 });
//! });
//! scheduler.wait_idle().await;
//! # }
//! ```

mod retry;
mod scheduler;

pub use retry::{RetryOutcome, retry};
pub use scheduler::WriteBackScheduler;
