//! Batch configuration
//!
//! A [`SimulationConfig`] describes one Monte-Carlo study: the facility
//! shape, the workload's distributions, the stopping rule, and the batch
//! parameters. Configurations are plain data, serializable, and validated
//! in full before any replication runs, so a bad parameter fails the batch
//! up front rather than partway through.

use qsim_core::{Distribution, SimError, SimTime};
use qsim_stats::CostModel;
use serde::{Deserialize, Serialize};

/// Complete description of a Monte-Carlo queueing study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of holder slots on the shared resource.
    pub capacity: usize,
    /// Interarrival gap distribution.
    pub arrival: Distribution,
    /// Service duration distribution.
    pub service: Distribution,
    /// Fixed entity count per replication; `None` means the horizon bounds
    /// the workload instead.
    #[serde(default)]
    pub entities: Option<usize>,
    /// Hard stop for the event clock; events past it never fire.
    #[serde(default)]
    pub horizon: Option<SimTime>,
    /// Number of independent replications in the batch.
    pub replications: usize,
    /// z-value of the two-sided confidence interval (1.96 for 95%).
    pub confidence_z: f64,
    /// Optional operating-cost model evaluated per replication.
    #[serde(default)]
    pub cost: Option<CostModel>,
}

impl SimulationConfig {
    /// Validate every parameter, reporting the first violation.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidParameter` for an out-of-domain distribution
    /// parameter, zero capacity, zero replications, a non-positive z, or a
    /// stopping rule that bounds the run by neither entity count nor
    /// horizon.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.capacity == 0 {
            return Err(SimError::invalid_parameter(
                "resource capacity must be a positive integer",
            ));
        }
        self.arrival.validate()?;
        self.service.validate()?;
        if self.entities.is_none() && self.horizon.is_none() {
            return Err(SimError::Configuration(
                "either an entity count or a horizon must bound the replication".into(),
            ));
        }
        if self.entities == Some(0) {
            return Err(SimError::invalid_parameter(
                "entity count must be positive when given",
            ));
        }
        if self.replications == 0 {
            return Err(SimError::invalid_parameter(
                "replication count must be at least 1",
            ));
        }
        if !self.confidence_z.is_finite() || self.confidence_z <= 0.0 {
            return Err(SimError::invalid_parameter(format!(
                "confidence z must be positive and finite, got {}",
                self.confidence_z
            )));
        }
        if let Some(cost) = &self.cost {
            if !cost.facility_cost.is_finite() || !cost.downtime_cost.is_finite() {
                return Err(SimError::invalid_parameter(
                    "cost rates must be finite",
                ));
            }
        }
        Ok(())
    }
}
