//! Workload generation
//!
//! A workload is the full arrival schedule of one replication, drawn up
//! front: every entity's absolute arrival instant (cumulative sum of
//! interarrival gaps) plus its service duration. Drawing the whole schedule
//! before the clock starts keeps the random streams independent of event
//! interleaving, so a seed fully determines the workload.

use qsim_core::{EntityId, Sampler, SimError, SimTime};
use std::time::Duration;
use tracing::debug;

/// One generated entity: who it is, when it arrives, how long its service
/// will take once it holds the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub entity: EntityId,
    pub arrival: SimTime,
    pub service: Duration,
}

/// Draw a fixed-size workload of `count` entities.
///
/// Arrival instants are the running sum of gaps drawn from
/// `arrival_sampler`; service durations come from `service_sampler`.
/// Negative draws (possible under the normal family) are clamped to zero by
/// the samplers, so arrivals never move backwards in time.
pub fn generate_count(
    count: usize,
    arrival_sampler: &mut Sampler,
    service_sampler: &mut Sampler,
) -> Vec<ArrivalRecord> {
    let mut records = Vec::with_capacity(count);
    let mut arrival = SimTime::zero();
    for id in 0..count {
        arrival = arrival + arrival_sampler.sample_duration();
        records.push(ArrivalRecord {
            entity: EntityId(id as u64),
            arrival,
            service: service_sampler.sample_duration(),
        });
    }
    debug!(count, "Generated fixed-size workload");
    records
}

/// Draw a workload covering `[0, horizon]`.
///
/// Generation stops at the first arrival instant past the horizon; that
/// entity is discarded. The result may be empty when the first gap alone
/// overshoots the horizon.
pub fn generate_until(
    horizon: SimTime,
    arrival_sampler: &mut Sampler,
    service_sampler: &mut Sampler,
) -> Vec<ArrivalRecord> {
    let mut records = Vec::new();
    let mut arrival = SimTime::zero();
    let mut id = 0u64;
    loop {
        arrival = arrival + arrival_sampler.sample_duration();
        if arrival > horizon {
            break;
        }
        records.push(ArrivalRecord {
            entity: EntityId(id),
            arrival,
            service: service_sampler.sample_duration(),
        });
        id += 1;
    }
    debug!(count = records.len(), horizon = %horizon, "Generated horizon-bounded workload");
    records
}

/// Build a workload from explicit interarrival gaps and service times, both
/// in seconds. Used for deterministic scenarios and tests.
///
/// # Errors
///
/// `SimError::InvalidParameter` when the slices have different lengths or
/// contain a negative or non-finite value.
pub fn from_gaps(gaps: &[f64], services: &[f64]) -> Result<Vec<ArrivalRecord>, SimError> {
    if gaps.len() != services.len() {
        return Err(SimError::invalid_parameter(format!(
            "gap and service lists must match: {} gaps vs {} services",
            gaps.len(),
            services.len()
        )));
    }
    if let Some(bad) = gaps
        .iter()
        .chain(services)
        .find(|v| !v.is_finite() || **v < 0.0)
    {
        return Err(SimError::invalid_parameter(format!(
            "gaps and services must be non-negative finite seconds, got {bad}"
        )));
    }

    let mut records = Vec::with_capacity(gaps.len());
    let mut arrival = SimTime::zero();
    for (id, (gap, service)) in gaps.iter().zip(services).enumerate() {
        arrival = arrival + Duration::from_secs_f64(*gap);
        records.push(ArrivalRecord {
            entity: EntityId(id as u64),
            arrival,
            service: Duration::from_secs_f64(*service),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_core::Distribution;

    #[test]
    fn test_from_gaps_cumulative_arrivals() {
        let records = from_gaps(&[0.0, 1.0, 1.0], &[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].arrival, SimTime::zero());
        assert_eq!(records[1].arrival, SimTime::from_secs(1));
        assert_eq!(records[2].arrival, SimTime::from_secs(2));
        assert_eq!(records[2].entity, EntityId(2));
        assert_eq!(records[2].service, Duration::from_secs(5));
    }

    #[test]
    fn test_from_gaps_rejects_mismatched_lengths() {
        assert!(from_gaps(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_from_gaps_rejects_negative_values() {
        assert!(from_gaps(&[-1.0], &[1.0]).is_err());
        assert!(from_gaps(&[1.0], &[f64::NAN]).is_err());
    }

    #[test]
    fn test_generate_count_is_seed_deterministic() {
        let arrivals = Distribution::Exponential { mean: 5.0 };
        let services = Distribution::Uniform { low: 1.0, high: 5.0 };

        let draw = |seed: u64| {
            let mut a = Sampler::new(arrivals, seed).unwrap();
            let mut s = Sampler::new(services, seed ^ 1).unwrap();
            generate_count(50, &mut a, &mut s)
        };
        assert_eq!(draw(42), draw(42));
        assert_ne!(draw(42), draw(43));
    }

    #[test]
    fn test_generate_count_arrivals_are_monotone() {
        let arrivals = Distribution::Normal { mean: 1.0, std_dev: 2.0 };
        let services = Distribution::Uniform { low: 1.0, high: 2.0 };
        let mut a = Sampler::new(arrivals, 7).unwrap();
        let mut s = Sampler::new(services, 8).unwrap();

        let records = generate_count(200, &mut a, &mut s);
        for pair in records.windows(2) {
            assert!(pair[0].arrival <= pair[1].arrival);
        }
    }

    #[test]
    fn test_generate_until_respects_horizon() {
        let arrivals = Distribution::Exponential { mean: 2.0 };
        let services = Distribution::Uniform { low: 1.0, high: 3.0 };
        let mut a = Sampler::new(arrivals, 11).unwrap();
        let mut s = Sampler::new(services, 12).unwrap();

        let horizon = SimTime::from_secs(100);
        let records = generate_until(horizon, &mut a, &mut s);
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.arrival <= horizon));
    }
}
