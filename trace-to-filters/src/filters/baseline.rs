use digiscope_common::Intensity;

use crate::Real;

/// Samples averaged at each end of the trace for the baseline guess.
pub const BASELINE_SAMPLES: usize = 5;

/// Estimates the trace baseline: the mean of the first [`BASELINE_SAMPLES`]
/// samples or of the last, whichever is smaller. Taking the minimum
/// discounts a pulse sitting at either end of the capture window.
///
/// Returns `None` for an empty trace. Shorter traces than
/// [`BASELINE_SAMPLES`] average whatever samples exist; the analysis entry
/// point rejects those before it gets here.
pub fn estimate_baseline(trace: &[Intensity]) -> Option<Real> {
    if trace.is_empty() {
        return None;
    }
    let head = mean(&trace[..trace.len().min(BASELINE_SAMPLES)]);
    let tail = mean(&trace[trace.len().saturating_sub(BASELINE_SAMPLES)..]);
    Some(head.min(tail))
}

fn mean(samples: &[Intensity]) -> Real {
    samples.iter().copied().map(Real::from).sum::<Real>() / samples.len() as Real
}
