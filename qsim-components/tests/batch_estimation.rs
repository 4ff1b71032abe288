//! End-to-end batch tests: configuration through interval estimation.

use qsim_components::{run_batch, run_batch_parallel, SimulationConfig};
use qsim_core::{Distribution, SimTime};
use qsim_stats::{estimate, CostModel, Metric, StatsError};

fn study() -> SimulationConfig {
    SimulationConfig {
        capacity: 1,
        arrival: Distribution::Exponential { mean: 5.0 },
        service: Distribution::Uniform { low: 1.0, high: 5.0 },
        entities: Some(100),
        horizon: None,
        replications: 30,
        confidence_z: 1.96,
        cost: None,
    }
}

#[test]
fn batch_yields_estimable_wait_metrics() {
    let config = study();
    let summaries = run_batch(&config, 2024).unwrap();
    assert_eq!(summaries.len(), 30);

    for metric in [Metric::MeanWait, Metric::TotalWait, Metric::IdleTime] {
        let batch = estimate(&summaries, metric, config.confidence_z).unwrap();
        assert_eq!(batch.n, 30);
        assert!(batch.confidence_interval[0] <= batch.sample_mean);
        assert!(batch.sample_mean <= batch.confidence_interval[1]);
    }
}

#[test]
fn batch_is_reproducible_across_modes() {
    let config = study();
    let sequential = run_batch(&config, 7).unwrap();
    let parallel = run_batch_parallel(&config, 7, 4).unwrap();
    assert_eq!(sequential, parallel);

    let a = estimate(&sequential, Metric::MeanWait, 1.96).unwrap();
    let b = estimate(&parallel, Metric::MeanWait, 1.96).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cost_metric_requires_a_cost_model() {
    let mut config = study();
    config.replications = 5;
    let without = run_batch(&config, 3).unwrap();
    assert_eq!(
        estimate(&without, Metric::TotalCost, 1.96),
        Err(StatsError::UndefinedMetric {
            metric: Metric::TotalCost,
            run: 0
        })
    );

    config.cost = Some(CostModel {
        facility_cost: 10.0,
        downtime_cost: 1.5,
    });
    let with = run_batch(&config, 3).unwrap();
    let batch = estimate(&with, Metric::TotalCost, 1.96).unwrap();
    assert!(batch.sample_mean > 0.0);
}

#[test]
fn horizon_bounded_study_reports_fixed_elapsed() {
    let mut config = study();
    config.entities = None;
    config.horizon = Some(SimTime::from_secs(300));
    config.replications = 10;

    let summaries = run_batch(&config, 55).unwrap();
    assert!(summaries.iter().all(|s| s.elapsed == 300.0));

    let utilization = estimate(&summaries, Metric::Utilization, 1.96).unwrap();
    assert!(utilization.sample_mean <= 100.0);
}

#[test]
fn empty_replications_leave_mean_wait_undefined_without_failing_the_batch() {
    // A horizon shorter than any plausible first arrival: replications
    // complete normally, they just serve nobody.
    let config = SimulationConfig {
        capacity: 1,
        arrival: Distribution::Uniform { low: 50.0, high: 60.0 },
        service: Distribution::Uniform { low: 1.0, high: 2.0 },
        entities: None,
        horizon: Some(SimTime::from_secs(10)),
        replications: 3,
        confidence_z: 1.96,
        cost: None,
    };
    let summaries = run_batch(&config, 1).unwrap();
    assert!(summaries.iter().all(|s| s.served == 0));
    assert!(summaries.iter().all(|s| s.mean_wait.is_none()));
    assert!(matches!(
        estimate(&summaries, Metric::MeanWait, 1.96),
        Err(StatsError::UndefinedMetric { .. })
    ));
}
