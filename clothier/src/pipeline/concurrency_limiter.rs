//! Admission gate bounding concurrent operations.
//!
//! The pipeline holds two limiters:
//!
//! - **network** — caps in-flight remote operations (resolution, content
//!   download and catalog pages combined) across a whole run, protecting
//!   the remote service from bursts.
//! - **cpu** — sizes the composite worker pool so image decode and encode
//!   never occupy more than a fixed number of blocking threads.
//!
//! # Usage
//!
//! ```
//! use clothier::pipeline::ConcurrencyLimiter;
//!
//! # tokio_test_block_on(async {
//! let limiter = ConcurrencyLimiter::new(10, "network");
//! {
//!     let _permit = limiter.acquire().await;
//!     assert_eq!(limiter.in_flight(), 1);
//!     // remote call happens here
//! }
//! // dropping the permit released the slot, whatever the call returned
//! assert_eq!(limiter.in_flight(), 0);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::trace;

/// Counting semaphore with in-flight instrumentation.
///
/// `acquire()` waits until fewer than `max_concurrent` permits are out.
/// Release happens when the returned [`ConcurrencyPermit`] is dropped, so
/// a slot is returned on every path out of the guarded operation,
/// including early returns with an error.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Semaphore,
    max_permits: usize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    label: String,
}

impl ConcurrencyLimiter {
    /// Creates a limiter admitting at most `max_concurrent` operations.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(max_concurrent: usize, label: impl Into<String>) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Semaphore::new(max_concurrent),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            label: label.into(),
        }
    }

    /// Waits for a free slot and admits the caller.
    ///
    /// Never fails: the semaphore is owned by the limiter and never closed.
    pub async fn acquire(&self) -> ConcurrencyPermit<'_> {
        if let Some(permit) = self.try_acquire() {
            return permit;
        }

        trace!(
            limiter = self.label(),
            in_flight = self.in_flight(),
            "Waiting for a free slot"
        );
        let permit = self
            .semaphore
            .acquire()
            .await
            .expect("limiter semaphore is never closed");
        self.admit(permit)
    }

    /// Admits the caller only if a slot is free right now.
    pub fn try_acquire(&self) -> Option<ConcurrencyPermit<'_>> {
        let permit = self.semaphore.try_acquire().ok()?;
        Some(self.admit(permit))
    }

    fn admit<'a>(&'a self, permit: SemaphorePermit<'a>) -> ConcurrencyPermit<'a> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        ConcurrencyPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        }
    }

    /// Returns the label for this limiter.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the maximum number of concurrently admitted operations.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Returns the number of currently admitted operations.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Returns the highest number of simultaneously admitted operations.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Returns the number of free slots.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// An admitted slot. Dropping it is the release.
pub struct ConcurrencyPermit<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for ConcurrencyPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
