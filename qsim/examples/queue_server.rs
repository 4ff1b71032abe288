//! Single-server queue study with a fixed customer population.
//!
//! Each replication pushes 100 customers through one server: exponential
//! interarrival gaps (mean 5s) and uniform service times on [1s, 5s). The
//! batch reduces 30 independent replications to 95% confidence intervals
//! and prints the result both as text and as JSON.
//!
//! Run with:
//!
//! ```sh
//! cargo run --example queue_server
//! RUST_LOG=qsim_core=debug cargo run --example queue_server
//! ```

use qsim::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    qsim::core::init_simulation_logging();

    let config = SimulationConfig {
        capacity: 1,
        arrival: Distribution::Exponential { mean: 5.0 },
        service: Distribution::Uniform { low: 1.0, high: 5.0 },
        entities: Some(100),
        horizon: None,
        replications: 30,
        confidence_z: 1.96,
        cost: None,
    };

    let summaries = run_batch(&config, 2024)?;

    println!(
        "{} replications of {} customers each (95% confidence)",
        config.replications,
        config.entities.unwrap_or_default()
    );
    let mut batches = Vec::new();
    for metric in [Metric::MeanWait, Metric::TotalWait, Metric::IdleTime] {
        let batch = estimate(&summaries, metric, config.confidence_z)?;
        println!("  {batch}");
        batches.push(batch);
    }

    println!("{}", serde_json::to_string_pretty(&batches)?);
    Ok(())
}
