//! Variate generation for interarrival gaps and service durations
//!
//! A [`Distribution`] is a plain descriptor (family plus parameters) that can
//! be carried in configuration, serialized, and validated before a batch
//! starts. A [`Sampler`] pairs a validated descriptor with its own seedable
//! random state; there is no global RNG anywhere, so replications can never
//! be correlated through shared mutable random state.

use crate::error::SimError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Distribution descriptor for arrival and service processes.
///
/// Parameters are validated by [`Distribution::validate`], which is called
/// from [`Sampler::new`] and from configuration validation; a malformed
/// descriptor fails at configuration time, never mid-replication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform over `[low, high)`; requires `low < high`
    Uniform { low: f64, high: f64 },
    /// Exponential with the given mean; requires `mean > 0`
    Exponential { mean: f64 },
    /// Normal with the given mean and standard deviation; requires
    /// `std_dev > 0`
    Normal { mean: f64, std_dev: f64 },
    /// Triangular over `[low, high]` with the given mode; requires
    /// `low <= mode <= high` and `low < high`
    Triangular { low: f64, mode: f64, high: f64 },
}

impl Distribution {
    /// Check the parameters against the distribution's domain.
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            Distribution::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(SimError::invalid_parameter(format!(
                        "uniform requires low < high, got [{low}, {high})"
                    )));
                }
            }
            Distribution::Exponential { mean } => {
                if !mean.is_finite() || mean <= 0.0 {
                    return Err(SimError::invalid_parameter(format!(
                        "exponential requires a positive mean, got {mean}"
                    )));
                }
            }
            Distribution::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
                    return Err(SimError::invalid_parameter(format!(
                        "normal requires a positive std_dev, got N({mean}, {std_dev})"
                    )));
                }
            }
            Distribution::Triangular { low, mode, high } => {
                let finite = low.is_finite() && mode.is_finite() && high.is_finite();
                if !finite || low >= high || mode < low || mode > high {
                    return Err(SimError::invalid_parameter(format!(
                        "triangular requires low <= mode <= high, got ({low}, {mode}, {high})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Theoretical mean of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Uniform { low, high } => (low + high) / 2.0,
            Distribution::Exponential { mean } => mean,
            Distribution::Normal { mean, .. } => mean,
            Distribution::Triangular { low, mode, high } => (low + mode + high) / 3.0,
        }
    }
}

/// Prepared `rand_distr` form of a validated descriptor.
enum Prepared {
    Uniform(rand_distr::Uniform<f64>),
    Exponential(rand_distr::Exp<f64>),
    Normal(rand_distr::Normal<f64>),
    Triangular(rand_distr::Triangular<f64>),
}

/// One-per-process-stream variate generator.
///
/// A sampler owns its random state (`ChaCha8Rng`), seeded explicitly for
/// reproducibility. Each Monte-Carlo replication builds fresh samplers from
/// its own derived seed.
pub struct Sampler {
    descriptor: Distribution,
    prepared: Prepared,
    rng: ChaCha8Rng,
}

impl Sampler {
    /// Build a sampler with a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` when the descriptor's parameters
    /// violate the distribution's domain.
    pub fn new(descriptor: Distribution, seed: u64) -> Result<Self, SimError> {
        Self::from_rng(descriptor, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Build a sampler from an already-seeded RNG.
    pub fn from_rng(descriptor: Distribution, rng: ChaCha8Rng) -> Result<Self, SimError> {
        descriptor.validate()?;
        let prepared = match descriptor {
            Distribution::Uniform { low, high } => {
                Prepared::Uniform(rand_distr::Uniform::new(low, high))
            }
            Distribution::Exponential { mean } => Prepared::Exponential(
                rand_distr::Exp::new(1.0 / mean)
                    .map_err(|e| SimError::invalid_parameter(e.to_string()))?,
            ),
            Distribution::Normal { mean, std_dev } => Prepared::Normal(
                rand_distr::Normal::new(mean, std_dev)
                    .map_err(|e| SimError::invalid_parameter(e.to_string()))?,
            ),
            Distribution::Triangular { low, mode, high } => Prepared::Triangular(
                rand_distr::Triangular::new(low, high, mode)
                    .map_err(|e| SimError::invalid_parameter(format!("{e:?}")))?,
            ),
        };
        Ok(Self {
            descriptor,
            prepared,
            rng,
        })
    }

    /// The descriptor this sampler draws from.
    pub fn descriptor(&self) -> Distribution {
        self.descriptor
    }

    /// Draw one pseudo-random sample.
    pub fn sample(&mut self) -> f64 {
        match &self.prepared {
            Prepared::Uniform(d) => self.rng.sample(d),
            Prepared::Exponential(d) => self.rng.sample(d),
            Prepared::Normal(d) => self.rng.sample(d),
            Prepared::Triangular(d) => self.rng.sample(d),
        }
    }

    /// Draw one sample as a non-negative duration in seconds.
    ///
    /// Distributions whose domain includes negative values (normal, uniform
    /// with a negative bound) are clamped at zero; time gaps and service
    /// durations cannot be negative.
    pub fn sample_duration(&mut self) -> Duration {
        Duration::from_secs_f64(self.sample().max(0.0))
    }

    /// Draw a finite sequence of `n` samples.
    pub fn sample_n(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_invalid_range() {
        let dist = Distribution::Uniform {
            low: 5.0,
            high: 1.0,
        };
        assert!(matches!(
            dist.validate(),
            Err(SimError::InvalidParameter(_))
        ));
        assert!(Sampler::new(dist, 1).is_err());
    }

    #[test]
    fn test_uniform_equal_bounds_invalid() {
        let dist = Distribution::Uniform {
            low: 2.0,
            high: 2.0,
        };
        assert!(dist.validate().is_err());
    }

    #[test]
    fn test_exponential_invalid_mean() {
        assert!(Distribution::Exponential { mean: 0.0 }.validate().is_err());
        assert!(Distribution::Exponential { mean: -3.0 }.validate().is_err());
        assert!(Distribution::Exponential { mean: 5.0 }.validate().is_ok());
    }

    #[test]
    fn test_normal_invalid_std_dev() {
        assert!(Distribution::Normal {
            mean: 1.0,
            std_dev: 0.0
        }
        .validate()
        .is_err());
        assert!(Distribution::Normal {
            mean: 1.0,
            std_dev: 0.5
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_triangular_mode_outside_bounds() {
        assert!(Distribution::Triangular {
            low: 0.0,
            mode: 5.0,
            high: 4.0
        }
        .validate()
        .is_err());
        assert!(Distribution::Triangular {
            low: 0.0,
            mode: 2.0,
            high: 4.0
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_uniform_samples_stay_in_range() {
        let mut sampler = Sampler::new(
            Distribution::Uniform {
                low: 1.0,
                high: 5.0,
            },
            42,
        )
        .unwrap();
        for _ in 0..100 {
            let x = sampler.sample();
            assert!((1.0..5.0).contains(&x));
        }
    }

    #[test]
    fn test_exponential_samples_positive() {
        let mut sampler = Sampler::new(Distribution::Exponential { mean: 5.0 }, 42).unwrap();
        for _ in 0..100 {
            assert!(sampler.sample() > 0.0);
        }
    }

    #[test]
    fn test_triangular_samples_stay_in_range() {
        let mut sampler = Sampler::new(
            Distribution::Triangular {
                low: 1.0,
                mode: 2.0,
                high: 4.0,
            },
            7,
        )
        .unwrap();
        for _ in 0..100 {
            let x = sampler.sample();
            assert!((1.0..=4.0).contains(&x));
        }
    }

    #[test]
    fn test_normal_duration_clamped_at_zero() {
        // Mean 0 with large spread draws plenty of negatives
        let mut sampler = Sampler::new(
            Distribution::Normal {
                mean: 0.0,
                std_dev: 10.0,
            },
            42,
        )
        .unwrap();
        for _ in 0..100 {
            assert!(sampler.sample_duration() >= Duration::ZERO);
        }
    }

    #[test]
    fn test_same_seed_reproduces_sequence() {
        let dist = Distribution::Exponential { mean: 5.0 };
        let mut a = Sampler::new(dist, 1234).unwrap();
        let mut b = Sampler::new(dist, 1234).unwrap();
        assert_eq!(a.sample_n(50), b.sample_n(50));
    }

    #[test]
    fn test_distinct_seeds_diverge() {
        let dist = Distribution::Exponential { mean: 5.0 };
        let mut a = Sampler::new(dist, 1).unwrap();
        let mut b = Sampler::new(dist, 2).unwrap();
        assert_ne!(a.sample_n(10), b.sample_n(10));
    }

    #[test]
    fn test_sample_n_length() {
        let mut sampler = Sampler::new(
            Distribution::Uniform {
                low: 0.0,
                high: 1.0,
            },
            9,
        )
        .unwrap();
        assert_eq!(sampler.sample_n(17).len(), 17);
    }

    #[test]
    fn test_descriptor_round_trip_serde() {
        let dist = Distribution::Triangular {
            low: 1.0,
            mode: 2.0,
            high: 3.0,
        };
        let json = serde_json::to_string(&dist).unwrap();
        let back: Distribution = serde_json::from_str(&json).unwrap();
        assert_eq!(dist, back);
    }

    #[test]
    fn test_theoretical_means() {
        assert_eq!(
            Distribution::Uniform {
                low: 1.0,
                high: 5.0
            }
            .mean(),
            3.0
        );
        assert_eq!(Distribution::Exponential { mean: 5.0 }.mean(), 5.0);
        assert_eq!(
            Distribution::Triangular {
                low: 0.0,
                mode: 3.0,
                high: 6.0
            }
            .mean(),
            3.0
        );
    }
}
