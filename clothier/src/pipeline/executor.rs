//! Runtime abstraction for the asset pipeline.
//!
//! Stages never call tokio directly. Per-asset work is fanned out through a
//! [`ConcurrentRunner`] and image work is moved off the async workers through
//! a [`BlockingExecutor`], so tests can swap either side.
//!
//! ```text
//! AssetPipeline ──run_concurrent──▶ one task per asset
//!                                     │
//!                                     ├─ resolve (async, network limiter)
//!                                     ├─ fetch   (async, network limiter)
//!                                     └─ composite ──execute_blocking──▶ blocking pool
//! ```

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Boxed future returned by [`BlockingExecutor::execute_blocking`].
pub type BlockingResult<R> = Pin<Box<dyn Future<Output = Result<R, ExecutorError>> + Send>>;

/// Boxed future returned by [`ConcurrentRunner::run_concurrent`].
pub type ConcurrentResults<R> = Pin<Box<dyn Future<Output = Vec<Result<R, ExecutorError>>> + Send>>;

/// Runs CPU-bound closures away from the async worker threads.
pub trait BlockingExecutor: Send + Sync + 'static {
    /// Executes `f` on a blocking-capable thread and resolves to its result.
    fn execute_blocking<F, R>(&self, f: F) -> BlockingResult<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static;
}

/// Runs a batch of futures concurrently and gathers every outcome.
pub trait ConcurrentRunner: Send + Sync + 'static {
    /// Results come back in completion order. A panicking task yields
    /// [`ExecutorError::TaskPanicked`] in its slot; the others still finish.
    fn run_concurrent<F, R>(&self, futures: Vec<F>) -> ConcurrentResults<R>
    where
        F: Future<Output = R> + Send + 'static,
        R: Send + 'static;
}

/// Failures raised by the executor itself, not by the work it runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("task panicked: {0}")]
    TaskPanicked(String),
}

/// Production executor backed by the ambient tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

impl TokioExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl BlockingExecutor for TokioExecutor {
    fn execute_blocking<F, R>(&self, f: F) -> BlockingResult<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        Box::pin(async move {
            tokio::task::spawn_blocking(f)
                .await
                .map_err(|e| ExecutorError::TaskPanicked(e.to_string()))
        })
    }
}

impl ConcurrentRunner for TokioExecutor {
    fn run_concurrent<F, R>(&self, futures: Vec<F>) -> ConcurrentResults<R>
    where
        F: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        Box::pin(async move {
            use tokio::task::JoinSet;

            let mut set = JoinSet::new();
            for fut in futures {
                set.spawn(fut);
            }

            let mut results = Vec::with_capacity(set.len());
            while let Some(result) = set.join_next().await {
                results.push(result.map_err(|e| ExecutorError::TaskPanicked(e.to_string())));
            }
            results
        })
    }
}

/// Executor that runs blocking work inline and futures one after another.
///
/// Deterministic ordering for unit tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncExecutor;

#[cfg(test)]
impl BlockingExecutor for SyncExecutor {
    fn execute_blocking<F, R>(&self, f: F) -> BlockingResult<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let result = f();
        Box::pin(std::future::ready(Ok(result)))
    }
}

#[cfg(test)]
impl ConcurrentRunner for SyncExecutor {
    fn run_concurrent<F, R>(&self, futures: Vec<F>) -> ConcurrentResults<R>
    where
        F: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        Box::pin(async move {
            let mut results = Vec::with_capacity(futures.len());
            for fut in futures {
                results.push(Ok(fut.await));
            }
            results
        })
    }
}
