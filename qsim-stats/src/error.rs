//! Error types for statistics and interval estimation

use crate::summary::Metric;
use thiserror::Error;

/// Errors raised by derived-statistic and interval computations.
///
/// These are recoverable signals, not batch failures: a replication with too
/// few observations simply reports the statistic as undefined, and an
/// interval request over too few replications fails without invalidating the
/// replications themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Insufficient data: statistic requires at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Insufficient replications: variance-based interval requires at least 2, got {got}")]
    InsufficientReplications { got: usize },

    #[error("Metric {metric} is undefined for replication {run}")]
    UndefinedMetric { metric: Metric, run: usize },
}
