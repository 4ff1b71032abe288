//! Monte-Carlo replication driver and interval estimation
//!
//! The driver runs N independent replications and reduces one scalar metric
//! of their summaries to a z-based confidence interval. Replications share
//! no mutable state: each factory call receives its own derived seed, so
//! batches can run sequentially or across threads with identical results.

use crate::error::StatsError;
use crate::summary::{Metric, ReplicationSummary};
use qsim_core::{replication_span, SimError};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Batch driver for N independent replications.
pub struct MonteCarlo {
    replications: usize,
    base_seed: u64,
}

impl MonteCarlo {
    /// Create a driver for `replications` runs derived from `base_seed`.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidParameter` when `replications` is zero.
    pub fn new(replications: usize, base_seed: u64) -> Result<Self, SimError> {
        if replications == 0 {
            return Err(SimError::invalid_parameter(
                "replication count must be at least 1",
            ));
        }
        Ok(Self {
            replications,
            base_seed,
        })
    }

    pub fn replications(&self) -> usize {
        self.replications
    }

    /// Seed for the given replication index.
    ///
    /// Seeds are mixed through splitmix64 so that consecutive run indices
    /// yield uncorrelated random states.
    pub fn seed_for(&self, run: usize) -> u64 {
        splitmix64(self.base_seed.wrapping_add(run as u64))
    }

    /// Run all replications sequentially, collecting one result per run.
    ///
    /// The factory receives the replication's derived seed and must build
    /// the whole run from it (workload draws included).
    pub fn run<T, F>(&self, mut factory: F) -> Vec<T>
    where
        F: FnMut(u64) -> T,
    {
        info!(replications = self.replications, "Starting Monte-Carlo batch");
        let mut summaries = Vec::with_capacity(self.replications);
        for run in 0..self.replications {
            let seed = self.seed_for(run);
            let span = replication_span(run, seed);
            let _guard = span.enter();
            summaries.push(factory(seed));
            debug!(run, "Replication finished");
        }
        summaries
    }

    /// Run all replications distributed over `workers` threads.
    ///
    /// Replications are embarrassingly parallel: every worker owns its own
    /// event clock, resource, and random state. Results are joined into
    /// replication order before returning, so the output is identical to
    /// [`MonteCarlo::run`] for the same base seed.
    pub fn run_parallel<T, F>(&self, workers: usize, factory: F) -> Vec<T>
    where
        T: Send,
        F: Fn(u64) -> T + Sync,
    {
        let workers = workers.max(1);
        info!(
            replications = self.replications,
            workers, "Starting parallel Monte-Carlo batch"
        );
        let mut slots: Vec<Option<T>> = Vec::new();
        slots.resize_with(self.replications, || None);
        let chunk_size = self.replications.div_ceil(workers);

        std::thread::scope(|scope| {
            for (worker, chunk) in slots.chunks_mut(chunk_size).enumerate() {
                let factory = &factory;
                let first_run = worker * chunk_size;
                scope.spawn(move || {
                    for (offset, slot) in chunk.iter_mut().enumerate() {
                        let run = first_run + offset;
                        let seed = self.seed_for(run);
                        let span = replication_span(run, seed);
                        let _guard = span.enter();
                        *slot = Some(factory(seed));
                    }
                });
            }
        });

        slots
            .into_iter()
            .map(|slot| slot.expect("worker filled every assigned replication"))
            .collect()
    }
}

/// Interval estimate of one scalar metric over a finished batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub metric: Metric,
    pub sample_mean: f64,
    pub sample_stdev: f64,
    /// Two-sided interval `mean ± z * stdev / sqrt(n)`
    pub confidence_interval: [f64; 2],
    pub n: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: mean={:.4} stdev={:.4} CI=({:.4}, {:.4}) n={}",
            self.metric,
            self.sample_mean,
            self.sample_stdev,
            self.confidence_interval[0],
            self.confidence_interval[1],
            self.n
        )
    }
}

/// Mean of a batch of scalar observations.
///
/// An empty slice yields NaN; interval estimation rejects batches below two
/// observations before this is reached, so the NaN never leaves
/// [`estimate`].
pub fn sample_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// # Errors
///
/// `StatsError::InsufficientReplications` below two observations.
pub fn sample_stdev(values: &[f64]) -> Result<f64, StatsError> {
    let n = values.len();
    if n < 2 {
        return Err(StatsError::InsufficientReplications { got: n });
    }
    let mean = sample_mean(values);
    let sum_sq: f64 = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum();
    Ok((sum_sq / (n - 1) as f64).sqrt())
}

/// Reduce a batch of replication summaries to an interval estimate of the
/// chosen metric, for a caller-supplied z (1.96 for 95%, 1.645 for 90%).
///
/// # Errors
///
/// - `StatsError::UndefinedMetric` when some replication cannot provide the
///   metric (e.g. mean wait of a run that served nothing).
/// - `StatsError::InsufficientReplications` when fewer than two replications
///   back the variance estimate. The replications themselves remain valid.
pub fn estimate(
    summaries: &[ReplicationSummary],
    metric: Metric,
    z: f64,
) -> Result<BatchSummary, StatsError> {
    let values: Vec<f64> = summaries
        .iter()
        .enumerate()
        .map(|(run, summary)| {
            summary
                .metric(metric)
                .ok_or(StatsError::UndefinedMetric { metric, run })
        })
        .collect::<Result<_, _>>()?;

    let stdev = sample_stdev(&values)?;
    let mean = sample_mean(&values);
    let margin = z * stdev / (values.len() as f64).sqrt();
    Ok(BatchSummary {
        metric,
        sample_mean: mean,
        sample_stdev: stdev,
        confidence_interval: [mean - margin, mean + margin],
        n: values.len(),
    })
}
