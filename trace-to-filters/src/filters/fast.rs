use digiscope_common::Intensity;

use crate::FilterValue;

/// Fast (trigger) filter: the difference of two running sums of `risetime`
/// samples separated by `gap` samples, taken over the raw trace.
///
/// Output index `i` holds the leading sum ending at `i` minus the trailing
/// sum starting `2 * risetime + gap - 1` samples earlier. Indices whose
/// trailing window would start before the trace, and the final index (whose
/// leading window needs the sample after `i`), stay zero.
pub fn fast_filter(trace: &[Intensity], risetime: usize, gap: usize) -> Vec<FilterValue> {
    let mut filter = vec![0; trace.len()];
    let Some(span) = risetime.checked_mul(2).and_then(|s| s.checked_add(gap)) else {
        return filter;
    };

    for i in 0..trace.len() {
        // Trailing window [i - 2R - G + 1, i - R - G + 1).
        let Some(trail_low) = (i + 1).checked_sub(span) else {
            continue;
        };
        let s0 = window_sum(trace, trail_low, risetime);

        // Leading window [i - R + 1, i + 1).
        if i + 1 < trace.len() {
            let s1 = window_sum(trace, i + 1 - risetime, risetime);
            filter[i] = s1 - s0;
        }
    }
    filter
}

fn window_sum(trace: &[Intensity], start: usize, len: usize) -> FilterValue {
    trace[start..start + len]
        .iter()
        .copied()
        .map(FilterValue::from)
        .sum()
}
