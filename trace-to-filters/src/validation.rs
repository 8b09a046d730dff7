//! Offline screening of captured traces.
//!
//! Decides whether a trace plausibly contains a pulse before it is worth
//! running the filters over it. The spread estimate is the scaled median
//! absolute deviation rather than a standard deviation, so a slow-decaying
//! pulse sitting on the trace does not inflate its own cut.

use digiscope_common::Intensity;

use crate::{Real, analyzer::AnalysisError};

/// Converts a median absolute deviation into a Gaussian-equivalent standard
/// deviation.
const MAD_SCALE: Real = 1.4826;

/// How many sigma a sample must stray from the median to count as signal.
const SIGNAL_SIGMA: Real = 10.0;

/// Minimum peak-over-median amplitude in ADC units. A near-flat trace has a
/// MAD close to zero, which would let single-count wobbles pass the sigma
/// cut.
const MIN_SIGNAL_AMPLITUDE: Real = 20.0;

/// Median of a slice, `nth_element` style: even lengths average the two
/// middle order statistics. `None` when the slice is empty.
pub fn median<T: Copy + Into<Real>>(values: &[T]) -> Option<Real> {
    if values.is_empty() {
        return None;
    }
    let mut values: Vec<Real> = values.iter().map(|&v| v.into()).collect();
    let len = values.len();
    let (left, mid_value, _) = values.select_nth_unstable_by(len / 2, Real::total_cmp);
    if len % 2 == 1 {
        Some(*mid_value)
    } else {
        let left_max = left.iter().copied().fold(Real::MIN, Real::max);
        Some(0.5 * (left_max + *mid_value))
    }
}

/// Whether the trace likely contains a pulse: some sample strays at least
/// [`SIGNAL_SIGMA`] robust standard deviations from the median (checked on
/// both sides, in case the polarity is configured wrong) and the positive
/// excursion clears [`MIN_SIGNAL_AMPLITUDE`].
///
/// An empty trace has no median and is rejected outright.
pub fn has_signal(trace: &[Intensity]) -> Result<bool, AnalysisError> {
    let median_level = median(trace).ok_or(AnalysisError::EmptyTrace)?;
    let deviations: Vec<Real> = trace
        .iter()
        .map(|&sample| (Real::from(sample) - median_level).abs())
        .collect();
    let mad = median(&deviations).ok_or(AnalysisError::EmptyTrace)?;
    let sigma = MAD_SCALE * mad;

    let max = trace.iter().copied().map(Real::from).fold(Real::MIN, Real::max);
    let min = trace.iter().copied().map(Real::from).fold(Real::MAX, Real::min);

    let strays = max > median_level + SIGNAL_SIGMA * sigma
        || min < median_level - SIGNAL_SIGMA * sigma;
    Ok(strays && max - median_level > MIN_SIGNAL_AMPLITUDE)
}
