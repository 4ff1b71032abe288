//! Replication statistics and Monte-Carlo aggregation
//!
//! This crate collects per-replication observations ([`RunStats`]), reduces
//! them to a [`ReplicationSummary`] per run, and aggregates batches of
//! independent replications into interval estimates ([`MonteCarlo`],
//! [`BatchSummary`]).

pub mod error;
pub mod monte_carlo;
pub mod run_stats;
pub mod summary;

pub use error::StatsError;
pub use monte_carlo::{estimate, sample_mean, sample_stdev, BatchSummary, MonteCarlo};
pub use run_stats::RunStats;
pub use summary::{CostModel, Metric, ReplicationSummary};
