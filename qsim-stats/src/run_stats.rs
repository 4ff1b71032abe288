//! Per-replication statistics collector
//!
//! [`RunStats`] is a pure accumulator: append-only while a replication runs,
//! read-only afterwards. It owns its state explicitly; nothing here is
//! shared between replications, which keeps parallel batches safe.

use crate::error::StatsError;
use crate::summary::{CostModel, ReplicationSummary};
use std::time::Duration;

/// Accumulates observations for one replication.
#[derive(Debug, Default)]
pub struct RunStats {
    waits: Vec<Duration>,
    queue_len_min: Option<usize>,
    queue_len_max: Option<usize>,
    idle_time: Duration,
    total_service: Duration,
    generated: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note one generated arrival record and its drawn service duration.
    pub fn note_generated(&mut self, service: Duration) {
        self.generated += 1;
        self.total_service += service;
    }

    /// Record an instantaneous wait-queue length observation.
    ///
    /// Called at the instant the queue length changes, so the running
    /// min/max bracket every observed length exactly.
    pub fn observe_queue_length(&mut self, len: usize) {
        self.queue_len_min = Some(self.queue_len_min.map_or(len, |m| m.min(len)));
        self.queue_len_max = Some(self.queue_len_max.map_or(len, |m| m.max(len)));
    }

    /// Record the waiting time of an entity whose service completed.
    pub fn record_wait(&mut self, wait: Duration) {
        self.waits.push(wait);
    }

    /// Credit an idle interval of the resource.
    pub fn add_idle(&mut self, idle: Duration) {
        self.idle_time += idle;
    }

    /// Number of completed waiting-time observations.
    pub fn count(&self) -> usize {
        self.waits.len()
    }

    pub fn total_wait(&self) -> Duration {
        self.waits.iter().sum()
    }

    pub fn idle_time(&self) -> Duration {
        self.idle_time
    }

    pub fn queue_len_min(&self) -> Option<usize> {
        self.queue_len_min
    }

    pub fn queue_len_max(&self) -> Option<usize> {
        self.queue_len_max
    }

    /// Mean waiting time in seconds.
    ///
    /// # Errors
    ///
    /// `StatsError::InsufficientData` when no waiting time has been
    /// recorded. Callers substitute an explicit "undefined" marker rather
    /// than a number.
    pub fn mean_wait(&self) -> Result<f64, StatsError> {
        if self.waits.is_empty() {
            return Err(StatsError::InsufficientData { needed: 1, got: 0 });
        }
        Ok(self.total_wait().as_secs_f64() / self.waits.len() as f64)
    }

    /// Sample variance of waiting times (seconds squared).
    ///
    /// # Errors
    ///
    /// `StatsError::InsufficientData` below two observations; the variance
    /// is reported as undefined instead of being computed.
    pub fn variance_of_wait(&self) -> Result<f64, StatsError> {
        let n = self.waits.len();
        if n < 2 {
            return Err(StatsError::InsufficientData { needed: 2, got: n });
        }
        let mean = self.total_wait().as_secs_f64() / n as f64;
        let sum_sq: f64 = self
            .waits
            .iter()
            .map(|w| {
                let d = w.as_secs_f64() - mean;
                d * d
            })
            .sum();
        Ok(sum_sq / (n - 1) as f64)
    }

    /// Resource utilization in percent over the given elapsed time.
    ///
    /// A zero-length replication is 100% utilized by convention; this guards
    /// the divide-by-zero rather than propagating an error.
    pub fn utilization(&self, elapsed: Duration) -> f64 {
        if elapsed.is_zero() {
            return 100.0;
        }
        let elapsed = elapsed.as_secs_f64();
        (elapsed - self.idle_time.as_secs_f64()) / elapsed * 100.0
    }

    /// Reduce the accumulated observations to a [`ReplicationSummary`].
    pub fn finish(
        self,
        elapsed: Duration,
        truncated: bool,
        cost: Option<(&CostModel, usize)>,
    ) -> ReplicationSummary {
        let utilization = self.utilization(elapsed);
        let total_wait = self.total_wait().as_secs_f64();
        let total_service = self.total_service.as_secs_f64();
        let total_cost = cost.map(|(model, capacity)| {
            model.total_cost(elapsed.as_secs_f64(), capacity, total_wait, total_service)
        });
        ReplicationSummary {
            generated: self.generated,
            served: self.waits.len(),
            mean_wait: self.mean_wait().ok(),
            total_wait,
            wait_variance: self.variance_of_wait().ok(),
            queue_len_min: self.queue_len_min,
            queue_len_max: self.queue_len_max,
            idle_time: self.idle_time.as_secs_f64(),
            elapsed: elapsed.as_secs_f64(),
            utilization,
            total_service,
            truncated,
            total_cost,
        }
    }
}
