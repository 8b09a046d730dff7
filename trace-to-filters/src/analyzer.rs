//! The one-call entry point: fetch a channel's settings, quantize them and
//! run the trace through all three filters.

use digiscope_common::{ChannelId, Intensity, MAX_ADC_TRACE_LEN, ModuleId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    FilterValue, Real,
    filters::{BASELINE_SAMPLES, cfd, estimate_baseline, fast_filter, slow_filter},
    parameters::{ChannelParam, FilterParameters, ParameterStore, StoreError},
    quantize::QuantizedParameters,
};

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("trace is empty, cannot compute filters")]
    EmptyTrace,
    #[error(
        "trace of {len} samples is shorter than the {min} sample baseline window",
        min = BASELINE_SAMPLES
    )]
    TraceTooShort { len: usize },
    #[error("sampling period (XDT) must be positive and finite, got {0}")]
    InvalidSamplePeriod(f64),
    #[error("channel parameter {param} has unusable value {value}")]
    InvalidParameter { param: ChannelParam, value: f64 },
    #[error(
        "pole-zero correction is undefined for a decay ratio of one \
         (tau {tau} samples over a {risetime} sample risetime)"
    )]
    PoleZeroUndefined { tau: usize, risetime: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The three filter signals computed from one trace, each exactly as long
/// as the trace itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOutput {
    pub fast_filter: Vec<FilterValue>,
    pub cfd: Vec<Real>,
    pub slow_filter: Vec<Real>,
}

/// Runs the full filter computation for one channel's captured trace.
///
/// The trace is checked first, so an empty or too-short trace fails before
/// a single parameter is fetched. The channel's settings are then read from
/// the store, quantized onto the XDT grid, and the filters run in a fixed
/// order: fast filter, CFD from the fast filter, baseline, slow filter.
#[tracing::instrument(skip(store, trace), fields(samples = trace.len()))]
pub fn analyze<S: ParameterStore>(
    store: &S,
    module: ModuleId,
    channel: ChannelId,
    trace: &[Intensity],
) -> Result<FilterOutput, AnalysisError> {
    if trace.is_empty() {
        return Err(AnalysisError::EmptyTrace);
    }
    if trace.len() < BASELINE_SAMPLES {
        return Err(AnalysisError::TraceTooShort { len: trace.len() });
    }
    if trace.len() > MAX_ADC_TRACE_LEN {
        warn!("trace is longer than the hardware can capture");
    }

    let physical = FilterParameters::from_store(store, module, channel)?;
    let quantized = QuantizedParameters::from_physical(&physical)?;
    debug!(
        xdt = physical.xdt,
        trigger_risetime = quantized.trigger_risetime,
        trigger_gap = quantized.trigger_gap,
        cfd_scale = quantized.cfd_scale,
        cfd_delay = quantized.cfd_delay,
        energy_risetime = quantized.energy_risetime,
        energy_gap = quantized.energy_gap,
        tau = quantized.tau,
        "settings quantized to whole samples"
    );

    let fast = fast_filter(trace, quantized.trigger_risetime, quantized.trigger_gap);
    let cfd_signal = cfd(&fast, quantized.cfd_scale, quantized.cfd_delay);

    let baseline = estimate_baseline(trace).ok_or(AnalysisError::EmptyTrace)?;
    debug!(baseline, "estimated baseline");
    let slow = slow_filter(
        trace,
        baseline,
        quantized.energy_risetime,
        quantized.energy_gap,
        quantized.tau,
    )?;

    Ok(FilterOutput {
        fast_filter: fast,
        cfd: cfd_signal,
        slow_filter: slow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::MemoryParameterStore;
    use assert_approx_eq::assert_approx_eq;
    use std::cell::Cell;

    /// Store with the reference setup: 0.1 us sampling, 0.5/0.1 us fast
    /// filter, CFD scale 4 delay 0.2 us, 1.0/0.1 us slow filter, 2.0 us tau.
    fn reference_store() -> MemoryParameterStore {
        let mut store = MemoryParameterStore::new();
        for (param, value) in [
            (ChannelParam::Xdt, 0.1),
            (ChannelParam::TriggerRisetime, 0.5),
            (ChannelParam::TriggerFlattop, 0.1),
            (ChannelParam::CfdScale, 4.0),
            (ChannelParam::CfdDelay, 0.2),
            (ChannelParam::EnergyRisetime, 1.0),
            (ChannelParam::EnergyFlattop, 0.1),
            (ChannelParam::Tau, 2.0),
        ] {
            store.set_chan_par(0, 3, param, value).unwrap();
        }
        store
    }

    fn step_decay_trace(
        len: usize,
        baseline: u16,
        start: usize,
        amplitude: f64,
        tau_samples: f64,
    ) -> Vec<Intensity> {
        (0..len)
            .map(|k| {
                if k < start {
                    baseline
                } else {
                    let decay = (-((k - start) as f64) / tau_samples).exp();
                    baseline + (amplitude * decay).round() as u16
                }
            })
            .collect()
    }

    /// Wraps a store and counts lookups, to show validation happens first.
    struct CountingStore {
        inner: MemoryParameterStore,
        reads: Cell<usize>,
    }

    impl ParameterStore for CountingStore {
        fn get_chan_par(
            &self,
            module: ModuleId,
            channel: ChannelId,
            param: ChannelParam,
        ) -> Result<f64, StoreError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get_chan_par(module, channel, param)
        }
    }

    #[test]
    fn empty_trace_fails_before_any_parameter_fetch() {
        let store = CountingStore {
            inner: reference_store(),
            reads: Cell::new(0),
        };
        assert_eq!(analyze(&store, 0, 3, &[]), Err(AnalysisError::EmptyTrace));
        assert_eq!(store.reads.get(), 0);
    }

    #[test]
    fn short_trace_fails_before_any_parameter_fetch() {
        let store = CountingStore {
            inner: reference_store(),
            reads: Cell::new(0),
        };
        assert_eq!(
            analyze(&store, 0, 3, &[100; 4]),
            Err(AnalysisError::TraceTooShort { len: 4 })
        );
        assert_eq!(store.reads.get(), 0);
    }

    #[test]
    fn store_misses_propagate() {
        let store = MemoryParameterStore::new();
        assert_eq!(
            analyze(&store, 1, 0, &[100; 10]),
            Err(AnalysisError::Store(StoreError::UnknownModule(1)))
        );
    }

    #[test]
    fn absurd_tau_is_rejected_as_degenerate() {
        let mut store = reference_store();
        store.set_chan_par(0, 3, ChannelParam::Tau, 1.0e18).unwrap();
        assert!(matches!(
            analyze(&store, 0, 3, &[100; 10]),
            Err(AnalysisError::PoleZeroUndefined { .. })
        ));
    }

    #[test]
    fn outputs_match_the_trace_length() {
        let store = reference_store();
        for len in [5, 37, 200] {
            let output = analyze(&store, 0, 3, &vec![100; len]).unwrap();
            assert_eq!(output.fast_filter.len(), len);
            assert_eq!(output.cfd.len(), len);
            assert_eq!(output.slow_filter.len(), len);
        }
    }

    #[test]
    fn flat_trace_gives_identically_zero_filters() {
        let store = reference_store();
        let output = analyze(&store, 0, 3, &[512; 50]).unwrap();
        assert_eq!(output.fast_filter, vec![0; 50]);
        assert_eq!(output.cfd, vec![0.0; 50]);
        assert_eq!(output.slow_filter, vec![0.0; 50]);
    }

    #[test]
    fn reference_pulse_end_to_end() {
        let store = reference_store();
        // 200 samples: baseline 100, step to 1000 at sample 50, decaying
        // with 20 samples (2.0 us at 0.1 us sampling), matching the tau
        // setting in the store.
        let trace = step_decay_trace(200, 100, 50, 900.0, 20.0);
        let output = analyze(&store, 0, 3, &trace).unwrap();

        assert_eq!(output.fast_filter.len(), 200);
        assert_eq!(output.cfd.len(), 200);
        assert_eq!(output.slow_filter.len(), 200);

        // Fast filter: quiet until its windows reach the step, peak while
        // the leading window straddles the rise, zero at the final index.
        assert_eq!(&output.fast_filter[..10], &[0; 10]);
        let peak_index = output
            .fast_filter
            .iter()
            .enumerate()
            .max_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        assert!((50..=55).contains(&peak_index), "peak at {peak_index}");
        assert_eq!(output.fast_filter[199], 0);

        // CFD: zero before the delay, positive on the leading edge, then a
        // zero crossing a few samples later.
        assert_eq!(&output.cfd[..2], &[0.0, 0.0]);
        assert!(output.cfd[50] > 0.0);
        let first_negative = (51..60).find(|&j| output.cfd[j] < 0.0).unwrap();
        assert!((52..=56).contains(&first_negative));

        // Slow filter: exactly zero while every window sits on the flat
        // baseline, then the pole-zero plateau where the gap window holds
        // the step. Plateau indices are start + risetime - 1 and the gap
        // width beyond.
        for i in 20..=49 {
            assert_eq!(output.slow_filter[i], 0.0, "index {i}");
        }
        let plateau = output.slow_filter[59];
        assert_approx_eq!(plateau, output.slow_filter[60], 40.0);

        // The plateau encodes the step height: A = plateau * (1 - b1).
        let b1 = (-1.0_f64 / 20.0).exp();
        assert_approx_eq!(plateau * (1.0 - b1), 900.0, 5.0);

        assert_eq!(output.slow_filter[199], 0.0);
    }

    #[test]
    fn simulated_pulse_runs_end_to_end() {
        use rand::{SeedableRng, rngs::StdRng};
        use trace_simulator::{PulseTemplate, RandomDistribution, generate_trace};

        let template = PulseTemplate {
            baseline: RandomDistribution::Constant { value: 1200.0 },
            amplitude: RandomDistribution::Constant { value: 6000.0 },
            start: RandomDistribution::Constant { value: 0.3 },
            risetime: RandomDistribution::Constant { value: 0.5 },
            decay: RandomDistribution::Constant { value: 5.0 },
            noise_sd: 10.0,
        };
        let mut rng = StdRng::seed_from_u64(117);
        let trace = generate_trace(&template, 1000, 0.1, &mut rng).unwrap();
        assert!(crate::validation::has_signal(&trace).unwrap());

        let mut store = reference_store();
        store.set_chan_par(0, 3, ChannelParam::Tau, 5.0).unwrap();
        let output = analyze(&store, 0, 3, &trace).unwrap();

        assert_eq!(output.fast_filter.len(), 1000);
        let fast_max = *output.fast_filter.iter().max().unwrap();
        assert!(fast_max > 2_000, "fast filter peak {fast_max}");

        assert!(output.cfd.iter().any(|&v| v > 0.0));
        assert!(output.cfd.iter().any(|&v| v < 0.0));

        let slow_max = output.slow_filter.iter().copied().fold(Real::MIN, Real::max);
        assert!(slow_max > 1.0e5, "slow filter peak {slow_max}");
    }
}
