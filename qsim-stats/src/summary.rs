//! Per-replication summaries and derived metrics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cost coefficients for a facility run.
///
/// Total cost is `facility_cost * elapsed * capacity +
/// downtime_cost * (total wait + total drawn service)`: the facility is paid
/// for per slot for the whole elapsed time, while waiting and service time
/// are billed as downtime of the entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Cost per unit of elapsed time per capacity slot
    pub facility_cost: f64,
    /// Cost per unit of entity downtime (waiting plus service)
    pub downtime_cost: f64,
}

impl CostModel {
    pub fn total_cost(
        &self,
        elapsed: f64,
        capacity: usize,
        total_wait: f64,
        total_service: f64,
    ) -> f64 {
        self.facility_cost * elapsed * capacity as f64
            + self.downtime_cost * (total_wait + total_service)
    }
}

/// Scalar metrics a batch estimate can be computed over.
///
/// This is a fixed, enumerated set selected by name. Custom user-supplied
/// performance expressions are deliberately not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MeanWait,
    TotalWait,
    IdleTime,
    MaxQueueLength,
    Utilization,
    TotalCost,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::MeanWait => "mean_wait",
            Metric::TotalWait => "total_wait",
            Metric::IdleTime => "idle_time",
            Metric::MaxQueueLength => "max_queue_length",
            Metric::Utilization => "utilization",
            Metric::TotalCost => "total_cost",
        };
        f.write_str(name)
    }
}

/// Scalar aggregates of one finished replication.
///
/// All durations are reported in seconds of simulated time. Statistics that
/// need a minimum number of observations (`mean_wait`, `wait_variance`) or
/// an enabled cost model (`total_cost`) are `None` when undefined rather
/// than a computed placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSummary {
    /// Entities generated for this replication
    pub generated: usize,
    /// Entities that completed service
    pub served: usize,
    /// Mean waiting time; undefined when no entity completed service
    pub mean_wait: Option<f64>,
    /// Sum of all completed waiting times
    pub total_wait: f64,
    /// Sample variance of waiting times; undefined below 2 observations
    pub wait_variance: Option<f64>,
    /// Smallest observed wait-queue length; undefined when nothing was observed
    pub queue_len_min: Option<usize>,
    /// Largest observed wait-queue length
    pub queue_len_max: Option<usize>,
    /// Cumulative time with every holder slot empty, up to the last time the
    /// resource re-engaged
    pub idle_time: f64,
    /// Elapsed simulated time of the replication
    pub elapsed: f64,
    /// `(elapsed - idle) / elapsed`, in percent; 100% for a zero-length run
    pub utilization: f64,
    /// Sum of all drawn service durations
    pub total_service: f64,
    /// True when a horizon ceiling cut the replication short with entities
    /// still in flight
    pub truncated: bool,
    /// Total facility cost; present only when a cost model was configured
    pub total_cost: Option<f64>,
}

impl ReplicationSummary {
    /// Extract the named scalar metric, or `None` when it is undefined for
    /// this replication.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::MeanWait => self.mean_wait,
            Metric::TotalWait => Some(self.total_wait),
            Metric::IdleTime => Some(self.idle_time),
            Metric::MaxQueueLength => self.queue_len_max.map(|m| m as f64),
            Metric::Utilization => Some(self.utilization),
            Metric::TotalCost => self.total_cost,
        }
    }
}
