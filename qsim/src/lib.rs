//! # qsim - Discrete-Event Queueing Simulator
//!
//! qsim is a deterministic, replayable, discrete-event queueing simulator
//! with a Monte-Carlo replication layer for interval estimation.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! qsim = "0.1"
//! ```
//!
//! Describe a study as a [`qsim_components::SimulationConfig`], run it with
//! [`qsim_components::run_batch`], and reduce the summaries to confidence
//! intervals with [`qsim_stats::estimate`]. A base seed fully determines the
//! batch, so results replay bit-for-bit.
//!
//! ## Examples
//!
//! See the `examples/` directory: `queue_server` for a fixed-population
//! study and `repair_bay` for a horizon-bounded study with an operating-cost
//! model.

pub use qsim_components as components;
pub use qsim_core as core;
pub use qsim_stats as stats;

// Convenience re-exports of commonly used items
pub mod prelude {
    //! Commonly used types and traits

    pub use qsim_core::{
        Component, Distribution, Execute, Executor, Key, Sampler, SimError, SimTime, Simulation,
    };

    pub use qsim_components::{
        run_batch, run_batch_parallel, run_replication, Facility, FacilityEvent, Resource,
        SimulationConfig,
    };

    pub use qsim_stats::{
        estimate, BatchSummary, CostModel, Metric, MonteCarlo, ReplicationSummary, RunStats,
        StatsError,
    };
}
