use crate::{FilterValue, Real};

/// Constant-fraction discriminator signal: the fast filter attenuated by
/// `1 - scale/8` minus a copy of itself delayed by `delay` samples.
///
/// The result is bipolar and its zero crossing is the timing estimate. The
/// first `delay` elements stay zero; a delay of at least the trace length
/// leaves the whole output zero.
pub fn cfd(fast_filter: &[FilterValue], scale: u32, delay: usize) -> Vec<Real> {
    let fraction = 1.0 - 0.125 * Real::from(scale);
    let mut signal = vec![0.0; fast_filter.len()];
    for i in delay..fast_filter.len() {
        signal[i] = fast_filter[i] as Real * fraction - fast_filter[i - delay] as Real;
    }
    signal
}
