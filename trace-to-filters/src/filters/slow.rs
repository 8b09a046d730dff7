use digiscope_common::Intensity;

use crate::{Real, analyzer::AnalysisError};

/// Slow (energy) filter: a trapezoidal filter whose three window sums are
/// weighted to cancel the exponential preamplifier decay, after H. Tan et
/// al., "A Fast Digital Filter Algorithm for Gamma-Ray Spectroscopy with
/// Double-Exponential Decaying Scintillators", IEEE Trans. Nucl. Sci. 51,
/// 1541 (2004).
///
/// `baseline` is subtracted from every sample before summing and `tau` is
/// the decay constant in samples. Indices whose windows run off either end
/// of the trace are left at zero, as is the final index.
pub fn slow_filter(
    trace: &[Intensity],
    baseline: Real,
    risetime: usize,
    gap: usize,
    tau: usize,
) -> Result<Vec<Real>, AnalysisError> {
    // Notation from Tan: b1 is the per-sample decay ratio, bL its power over
    // the risetime window, a0/ag/a1 the inverse-matrix coefficients (worked
    // example at the bottom of p. 1542).
    let b1 = (-1.0 / tau as Real).exp();
    let b_l = b1.powf(risetime as Real);
    if b_l == 1.0 {
        return Err(AnalysisError::PoleZeroUndefined { tau, risetime });
    }
    let a0 = b_l / (b_l - 1.0);
    let ag = 1.0;
    let a1 = 1.0 / (1.0 - b_l);

    let mut filter = vec![0.0; trace.len()];
    let Some(span) = risetime.checked_mul(2).and_then(|s| s.checked_add(gap)) else {
        return Ok(filter);
    };

    for i in 0..trace.len() {
        // Trailing window [i - 2R - G + 1, i - R - G + 1).
        let Some(trail_low) = (i + 1).checked_sub(span) else {
            continue;
        };
        let s0 = window_sum(trace, baseline, trail_low, risetime);

        // Gap window [i - R - G + 1, i - R + 1), only while it stays on the
        // trace.
        let gap_low = trail_low + risetime;
        let sg = if gap_low + gap < trace.len() {
            window_sum(trace, baseline, gap_low, gap)
        } else {
            0.0
        };

        // Leading window [i - R + 1, i + 1); its upper edge is i + 1, so the
        // final trace index never gets a filter value.
        let lead_low = gap_low + gap;
        if lead_low + risetime < trace.len() {
            let s1 = window_sum(trace, baseline, lead_low, risetime);
            filter[i] = a0 * s0 + ag * sg + a1 * s1;
        }
    }
    Ok(filter)
}

fn window_sum(trace: &[Intensity], baseline: Real, start: usize, len: usize) -> Real {
    trace[start..start + len]
        .iter()
        .map(|&sample| Real::from(sample) - baseline)
        .sum()
}
