// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic job scheduling.
//!
//! The registry hands every new light's refresh job to a [`Scheduler`].
//! [`TokioScheduler`] runs jobs on the tokio runtime; tests can substitute
//! a scheduler that only records what was registered.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

/// The future produced by one run of a [`Job`].
pub type JobFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A repeatable job. Each call produces the future for one run.
pub type Job = Box<dyn Fn() -> JobFuture + Send + Sync + 'static>;

/// Runs jobs at a fixed interval.
pub trait Scheduler: Send + Sync {
    /// Registers `job` to run every `interval`, starting one interval from now.
    fn schedule(&self, interval: Duration, job: Job);
}

/// Scheduler backed by tokio tasks.
///
/// Runs of the same job never overlap. A run that panics is logged and the
/// job keeps its schedule. All jobs stop when the scheduler is dropped or
/// [`shutdown`](Self::shutdown) is called, including a run in progress.
///
/// Must be used from within a tokio runtime.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use emuhue_lib::{JobFuture, Scheduler, TokioScheduler};
///
/// # #[tokio::main]
/// # async fn main() {
/// let scheduler = TokioScheduler::new();
/// scheduler.schedule(
///     Duration::from_secs(5),
///     Box::new(|| -> JobFuture { Box::pin(async { tracing::info!("tick") }) }),
/// );
/// assert_eq!(scheduler.job_count(), 1);
/// scheduler.shutdown();
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TokioScheduler {
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Creates a scheduler with no jobs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of scheduled jobs.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Stops all jobs.
    pub fn shutdown(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in &tasks {
            task.abort();
        }
        if !tasks.is_empty() {
            tracing::debug!(jobs = tasks.len(), "Scheduler stopped");
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval: Duration, job: Job) {
        let interval = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Dropping the set aborts the current run along with this loop.
            let mut run = JoinSet::new();
            loop {
                ticker.tick().await;
                run.spawn(job());
                if let Some(Err(e)) = run.join_next().await
                    && e.is_panic()
                {
                    tracing::error!(error = %e, "Scheduled job panicked");
                }
            }
        });

        self.tasks.lock().push(task);
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
