//! Per-agent registry of in-flight asynchronous work.
//!
//! Agents never await an externally-latent decision (a reasoning call, a
//! human input queue) inline. They spawn it through their [`TaskSet`] so that
//! a racing `stop()` can cancel it, and [`TaskSet::stop`] only returns once
//! every unit it ever spawned has reached a final state. Ownership is
//! strictly per-agent; there is no global registry.

use std::future::Future;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// The normal outcome of `stop()` racing a pending decision. Not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("task was cancelled")]
pub struct Cancelled;

/// Cancellable registry of spawned units of work.
pub struct TaskSet {
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl TaskSet {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Spawn a unit of work that races against cancellation.
    ///
    /// The unit is tracked until it finishes, whether it completes naturally
    /// or loses the race to [`TaskSet::stop`].
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<Result<F::Output, Cancelled>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.cancel.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => Err(Cancelled),
                out = fut => Ok(out),
            }
        })
    }

    /// Spawn-and-await sugar: the unit is still registered, so an external
    /// `stop()` racing this await cancels it and the caller observes
    /// [`Cancelled`] as a normal outcome.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Cancelled>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match self.spawn(fut).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(Cancelled),
            Err(join_err) => std::panic::resume_unwind(join_err.into_panic()),
        }
    }

    /// Cancel every still-pending unit, then wait for all of them to reach a
    /// final state. Idempotent; no unit outlives this call.
    pub async fn stop(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Number of units that have not yet reached a final state.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }
}

impl Default for TaskSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn run_returns_the_value_on_natural_completion() {
        let tasks = TaskSet::new();
        assert_eq!(tasks.run(async { 41 + 1 }).await, Ok(42));
        assert_eq!(tasks.in_flight(), 0);
    }

    #[tokio::test]
    async fn stop_cancels_a_pending_run() {
        let tasks = Arc::new(TaskSet::new());
        let pending = {
            let tasks = Arc::clone(&tasks);
            tokio::spawn(async move {
                tasks
                    .run(async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        0
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;

        tasks.stop().await;
        assert_eq!(pending.await.unwrap(), Err(Cancelled));
        assert_eq!(tasks.in_flight(), 0);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let tasks = TaskSet::new();
        tasks.stop().await;
        tasks.stop().await;
        assert!(tasks.is_stopped());
    }

    #[tokio::test]
    async fn spawn_after_stop_dies_immediately() {
        let tasks = TaskSet::new();
        tasks.stop().await;
        assert_eq!(tasks.run(async { 1 }).await, Err(Cancelled));
    }

    #[tokio::test]
    async fn completed_work_is_untracked() {
        let tasks = TaskSet::new();
        let handle = tasks.spawn(async { "done" });
        assert_eq!(handle.await.unwrap(), Ok("done"));
        // Natural completion removes the unit from the registry.
        tasks.stop().await;
        assert_eq!(tasks.in_flight(), 0);
    }
}
