//! Synthetic single-pulse ADC traces for offline work.
//!
//! When no captured data is to hand, the filter computation can be exercised
//! on generated traces instead: one exponential-rise, exponential-decay
//! pulse per trace, sitting on a flat baseline with Gaussian sampling noise.
//! A pulse population is described by a [`PulseTemplate`] whose fields are
//! random distributions, so repeated draws give varied but plausible pulses.
//!
//! All sampling goes through a caller-supplied [`Rng`], so a seeded
//! generator makes every trace reproducible.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use thiserror::Error;

pub mod generator;

pub use generator::{Pulse, PulseTemplate, generate_trace};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid normal distribution: {0}")]
    NormalDistribution(#[from] rand_distr::NormalError),
    #[error("normal distribution needs a non-negative standard deviation, got {sd}")]
    NegativeNormalSd { sd: f64 },
    #[error("uniform distribution needs min <= max, got {min}..{max}")]
    EmptyUniformRange { min: f64, max: f64 },
}

/// How one pulse property is drawn.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "random-type")]
pub enum RandomDistribution {
    Constant { value: f64 },
    Uniform { min: f64, max: f64 },
    Normal { mean: f64, sd: f64 },
}

impl RandomDistribution {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SimulationError> {
        match self {
            Self::Constant { value } => Ok(*value),
            Self::Uniform { min, max } => {
                if min > max {
                    return Err(SimulationError::EmptyUniformRange {
                        min: *min,
                        max: *max,
                    });
                }
                Ok(rng.random_range(*min..=*max))
            }
            Self::Normal { mean, sd } => {
                // rand_distr only rejects a NaN standard deviation itself;
                // a negative one would silently sample.
                if *sd < 0.0 {
                    return Err(SimulationError::NegativeNormalSd { sd: *sd });
                }
                Ok(Normal::new(*mean, *sd)?.sample(rng))
            }
        }
    }
}
