//! Drawing pulses from a template and rendering them into traces.

use digiscope_common::Intensity;
use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use tracing::debug;

use crate::{RandomDistribution, SimulationError};

/// A population of single pulses.
///
/// Durations are in microseconds, levels in ADC units and the start
/// position is a fraction of the trace length, so one template serves any
/// trace length and sampling period.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PulseTemplate {
    /// Flat baseline level.
    pub baseline: RandomDistribution,
    /// Pulse amplitude above the baseline.
    pub amplitude: RandomDistribution,
    /// Pulse start as a fraction of the trace length.
    pub start: RandomDistribution,
    /// Exponential rise time.
    pub risetime: RandomDistribution,
    /// Exponential decay time.
    pub decay: RandomDistribution,
    /// Standard deviation of the per-sample Gaussian noise, ADC units.
    pub noise_sd: f64,
}

impl Default for PulseTemplate {
    /// The population of the control library's offline test generator:
    /// baseline U(1000, 2000), amplitude U(100, 10000), start U(0.05, 0.95),
    /// rise N(0.5, 0.05) us, decay N(5.0, 0.05) us, noise sd 10.
    fn default() -> Self {
        Self {
            baseline: RandomDistribution::Uniform {
                min: 1000.0,
                max: 2000.0,
            },
            amplitude: RandomDistribution::Uniform {
                min: 100.0,
                max: 10000.0,
            },
            start: RandomDistribution::Uniform {
                min: 0.05,
                max: 0.95,
            },
            risetime: RandomDistribution::Normal {
                mean: 0.5,
                sd: 0.05,
            },
            decay: RandomDistribution::Normal { mean: 5.0, sd: 0.05 },
            noise_sd: 10.0,
        }
    }
}

impl PulseTemplate {
    /// Draws one pulse for a trace of `trace_len` samples.
    pub fn sample_pulse<R: Rng + ?Sized>(
        &self,
        trace_len: usize,
        rng: &mut R,
    ) -> Result<Pulse, SimulationError> {
        if self.noise_sd < 0.0 {
            return Err(SimulationError::NegativeNormalSd { sd: self.noise_sd });
        }
        let pulse = Pulse {
            baseline: self.baseline.sample(rng)?,
            amplitude: self.amplitude.sample(rng)?,
            start: self.start.sample(rng)? * trace_len as f64,
            risetime: self.risetime.sample(rng)?,
            decay: self.decay.sample(rng)?,
            noise: Normal::new(0.0, self.noise_sd)?,
        };
        debug!(
            baseline = pulse.baseline,
            amplitude = pulse.amplitude,
            start = pulse.start,
            risetime = pulse.risetime,
            decay = pulse.decay,
            "sampled pulse"
        );
        Ok(pulse)
    }
}

/// One sampled pulse: `C + A * (1 - exp(-dt/rise)) * exp(-dt/decay)` on a
/// flat baseline `C`, zero before the start.
#[derive(Clone, Copy, Debug)]
pub struct Pulse {
    baseline: f64,
    amplitude: f64,
    /// Start position in samples.
    start: f64,
    risetime: f64,
    decay: f64,
    noise: Normal<f64>,
}

impl Pulse {
    /// Noise-free pulse value at `sample`, with `bin_width` the sampling
    /// period in microseconds.
    pub fn ideal_value_at(&self, sample: usize, bin_width: f64) -> f64 {
        let dt = (sample as f64 - self.start) * bin_width;
        if dt < 0.0 {
            self.baseline
        } else {
            self.baseline
                + self.amplitude
                    * (1.0 - (-dt / self.risetime).exp())
                    * (-dt / self.decay).exp()
        }
    }

    /// Pulse value with sampling noise, rounded and clamped into ADC range.
    pub fn value_at<R: Rng + ?Sized>(
        &self,
        sample: usize,
        bin_width: f64,
        rng: &mut R,
    ) -> Intensity {
        let value = self.ideal_value_at(sample, bin_width) + self.noise.sample(rng);
        value.round().clamp(0.0, f64::from(Intensity::MAX)) as Intensity
    }
}

/// Renders a trace of `length` samples containing one pulse drawn from
/// `template`, with `bin_width` the sampling period in microseconds.
pub fn generate_trace<R: Rng + ?Sized>(
    template: &PulseTemplate,
    length: usize,
    bin_width: f64,
    rng: &mut R,
) -> Result<Vec<Intensity>, SimulationError> {
    let pulse = template.sample_pulse(length, rng)?;
    Ok((0..length)
        .map(|sample| pulse.value_at(sample, bin_width, rng))
        .collect_vec())
}
