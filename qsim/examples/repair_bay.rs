//! Horizon-bounded repair-bay study with an operating-cost model.
//!
//! Trucks arrive at a two-bay depot over one 8-hour shift (exponential gaps,
//! mean 20 minutes) and each unload takes a triangular 10/25/45 minutes.
//! Trucks still waiting or still in a bay at the end of the shift are
//! truncated. The batch estimates 90% confidence intervals for the shift
//! cost, bay utilization, and worst backlog.
//!
//! Run with:
//!
//! ```sh
//! cargo run --example repair_bay
//! ```

use qsim::prelude::*;

const MINUTE: f64 = 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    qsim::core::init_simulation_logging();

    let config = SimulationConfig {
        capacity: 2,
        arrival: Distribution::Exponential { mean: 20.0 * MINUTE },
        service: Distribution::Triangular {
            low: 10.0 * MINUTE,
            mode: 25.0 * MINUTE,
            high: 45.0 * MINUTE,
        },
        entities: None,
        horizon: Some(SimTime::from_secs(8 * 3600)),
        replications: 50,
        confidence_z: 1.645,
        cost: Some(CostModel {
            // Dollars per bay-second of shift, and per second a truck
            // spends waiting or unloading.
            facility_cost: 0.02,
            downtime_cost: 0.05,
        }),
    };

    let summaries = run_batch_parallel(&config, 77, 4)?;

    let truncated = summaries.iter().filter(|s| s.truncated).count();
    println!(
        "{} shifts simulated, {} ended with trucks still in the yard (90% confidence)",
        summaries.len(),
        truncated
    );
    for metric in [
        Metric::TotalCost,
        Metric::Utilization,
        Metric::MaxQueueLength,
    ] {
        println!("  {}", estimate(&summaries, metric, config.confidence_z)?);
    }
    Ok(())
}
