// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded execution of blocking inference jobs.
//
// Two semaphores guard the pool:
//
//   - `admission` holds `workers + queue_depth` permits. A request that
//     cannot take one is rejected at once with `Saturated`.
//   - `workers` holds `workers` permits. Admitted requests wait here for a
//     free slot, then run on `spawn_blocking`.
//
// Both permits move into the blocking closure, so a job that outlives its
// request timeout still counts against the bounds until it actually ends.

use std::sync::Arc;
use std::time::Duration;

use facemood_core::config::{MAX_IN_FLIGHT, ServiceConfig};
use facemood_core::error::{FacemoodError, Result};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Bounded worker pool with admission control and a per-request deadline.
#[derive(Clone)]
pub struct InferencePool {
    admission: Arc<Semaphore>,
    workers: Arc<Semaphore>,
    capacity: usize,
    timeout: Duration,
}

impl InferencePool {
    /// Create a pool with `workers` concurrent jobs and room for
    /// `queue_depth` more waiting behind them.
    ///
    /// Sizes are clamped to at least one worker and at most
    /// [`MAX_IN_FLIGHT`] admitted requests.
    pub fn new(workers: usize, queue_depth: usize, timeout: Duration) -> Self {
        let workers = workers.clamp(1, MAX_IN_FLIGHT);
        let capacity = workers.saturating_add(queue_depth).min(MAX_IN_FLIGHT);
        Self {
            admission: Arc::new(Semaphore::new(capacity)),
            workers: Arc::new(Semaphore::new(workers)),
            capacity,
            timeout,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            config.workers,
            config.queue_depth,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Maximum number of requests admitted at once (running + waiting).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Requests currently running or waiting for a worker.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.admission.available_permits()
    }

    /// Run `job` on a blocking thread once a worker is free.
    ///
    /// # Errors
    ///
    /// - [`FacemoodError::Saturated`] if the pool is already at capacity.
    /// - [`FacemoodError::Timeout`] if waiting plus running exceeds the
    ///   deadline.
    /// - [`FacemoodError::Classification`] if the job panicked.
    /// - Whatever `job` itself returns.
    pub async fn run<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let admitted = Arc::clone(&self.admission)
            .try_acquire_owned()
            .map_err(|_| {
                warn!(capacity = self.capacity, "Inference pool saturated");
                FacemoodError::Saturated
            })?;

        let workers = Arc::clone(&self.workers);
        let work = async move {
            let slot = workers
                .acquire_owned()
                .await
                .map_err(|_| FacemoodError::Saturated)?;
            debug!("Worker slot acquired");

            tokio::task::spawn_blocking(move || {
                let _slot = slot;
                let _admitted = admitted;
                job()
            })
            .await
            .map_err(|err| FacemoodError::Classification(format!("inference task failed: {}", err)))?
        };

        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms = millis, "Inference timed out");
                Err(FacemoodError::Timeout(millis))
            }
        }
    }
}
