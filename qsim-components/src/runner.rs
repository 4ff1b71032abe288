//! Replication runner
//!
//! Glues the pieces of one study together: a validated configuration plus a
//! seed fully determine a replication. Each replication builds a fresh
//! simulation, facility, and samplers, so batches can run sequentially or
//! across threads with identical output.

use crate::config::SimulationConfig;
use crate::facility::{Facility, FacilityEvent};
use crate::workload;
use qsim_core::{Executor, Sampler, SimError, Simulation};
use qsim_stats::{MonteCarlo, ReplicationSummary};
use tracing::debug;

/// Stream-splitting constant (golden-ratio increment), so the arrival and
/// service samplers of one replication never share a seed.
const SERVICE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Run one replication of the configured study.
///
/// The caller is expected to have validated `config`; a batch validates once
/// up front. The seed determines the whole replication: both samplers derive
/// their streams from it.
///
/// # Errors
///
/// `SimError::InvalidParameter` when the configuration's distributions or
/// capacity are out of domain.
pub fn run_replication(
    config: &SimulationConfig,
    seed: u64,
) -> Result<ReplicationSummary, SimError> {
    let mut arrival_sampler = Sampler::new(config.arrival, seed)?;
    let mut service_sampler = Sampler::new(config.service, seed ^ SERVICE_STREAM)?;

    let records = match (config.entities, config.horizon) {
        (Some(count), _) => {
            workload::generate_count(count, &mut arrival_sampler, &mut service_sampler)
        }
        (None, Some(horizon)) => {
            workload::generate_until(horizon, &mut arrival_sampler, &mut service_sampler)
        }
        (None, None) => {
            return Err(SimError::Configuration(
                "either an entity count or a horizon must bound the replication".into(),
            ));
        }
    };

    let mut sim = Simulation::default();
    let facility = Facility::new(records.clone(), config.capacity)?;
    let key = sim.add_component(facility);
    // The clock is at zero, so the delay is the absolute arrival time.
    for record in &records {
        sim.schedule(record.arrival, key, FacilityEvent::Arrival(record.entity));
    }

    match config.horizon {
        Some(horizon) => sim.execute(Executor::timed(horizon)),
        None => sim.execute(Executor::unbound()),
    }

    // A horizon truncates whatever is still scheduled; the replication's
    // elapsed time is the horizon itself even when events ran out earlier.
    let truncated = config.horizon.is_some() && sim.has_pending_events();
    let elapsed = match config.horizon {
        Some(horizon) => horizon.as_duration(),
        None => sim.time().as_duration(),
    };

    let facility: Facility = sim.remove_component(key).ok_or_else(|| {
        SimError::ComponentNotFound {
            id: key.id().to_string(),
        }
    })?;
    let cost = config.cost.as_ref().map(|model| (model, config.capacity));
    let summary = facility.into_stats().finish(elapsed, truncated, cost);
    debug!(
        served = summary.served,
        generated = summary.generated,
        truncated = summary.truncated,
        "Replication complete"
    );
    Ok(summary)
}

/// Run the configured batch sequentially.
///
/// # Errors
///
/// Validation errors surface before any replication runs.
pub fn run_batch(
    config: &SimulationConfig,
    base_seed: u64,
) -> Result<Vec<ReplicationSummary>, SimError> {
    config.validate()?;
    let driver = MonteCarlo::new(config.replications, base_seed)?;
    driver
        .run(|seed| run_replication(config, seed))
        .into_iter()
        .collect()
}

/// Run the configured batch over `workers` threads. Output is identical to
/// [`run_batch`] for the same base seed.
///
/// # Errors
///
/// Validation errors surface before any replication runs.
pub fn run_batch_parallel(
    config: &SimulationConfig,
    base_seed: u64,
    workers: usize,
) -> Result<Vec<ReplicationSummary>, SimError> {
    config.validate()?;
    let driver = MonteCarlo::new(config.replications, base_seed)?;
    driver
        .run_parallel(workers, |seed| run_replication(config, seed))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_core::{Distribution, SimTime};

    fn config() -> SimulationConfig {
        SimulationConfig {
            capacity: 1,
            arrival: Distribution::Exponential { mean: 5.0 },
            service: Distribution::Uniform { low: 1.0, high: 5.0 },
            entities: Some(50),
            horizon: None,
            replications: 4,
            confidence_z: 1.96,
            cost: None,
        }
    }

    #[test]
    fn test_replication_is_seed_deterministic() {
        let config = config();
        let a = run_replication(&config, 42).unwrap();
        let b = run_replication(&config, 42).unwrap();
        assert_eq!(a, b);
        let c = run_replication(&config, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_unbounded_run_serves_everyone() {
        let summary = run_replication(&config(), 7).unwrap();
        assert_eq!(summary.generated, 50);
        assert_eq!(summary.served, 50);
        assert!(!summary.truncated);
    }

    #[test]
    fn test_horizon_truncates_and_fixes_elapsed() {
        let mut config = config();
        // Heavy traffic so the backlog outlives the horizon.
        config.arrival = Distribution::Exponential { mean: 0.5 };
        config.service = Distribution::Uniform { low: 4.0, high: 6.0 };
        config.horizon = Some(SimTime::from_secs(60));
        let summary = run_replication(&config, 11).unwrap();

        assert_eq!(summary.elapsed, 60.0);
        assert!(summary.truncated);
        assert!(summary.served < summary.generated);
    }

    #[test]
    fn test_idle_and_busy_partition_the_timeline() {
        // Unbounded single-slot run: the resource is either idle or serving
        // at every instant, and every drawn service completes, so idle time
        // plus total service must account for the whole elapsed time.
        let summary = run_replication(&config(), 3).unwrap();
        assert!(
            (summary.idle_time + summary.total_service - summary.elapsed).abs() < 1e-6,
            "idle {} + busy {} != elapsed {}",
            summary.idle_time,
            summary.total_service,
            summary.elapsed
        );
        assert!((0.0..=100.0).contains(&summary.utilization));
    }

    #[test]
    fn test_sequential_and_parallel_batches_agree() {
        let config = config();
        let sequential = run_batch(&config, 99).unwrap();
        let parallel = run_batch_parallel(&config, 99, 3).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), config.replications);
    }

    #[test]
    fn test_batch_rejects_invalid_config() {
        let mut config = config();
        config.capacity = 0;
        assert!(run_batch(&config, 1).is_err());
    }
}
