//! Conversion of physical channel settings onto the sample grid.
//!
//! Filter lengths are configured in microseconds but the firmware works in
//! whole samples of the channel's sampling period (XDT). Rise times, the
//! CFD delay and tau clamp to a minimum of one sample. Gaps do not: a gap
//! that rounds to zero samples is a valid triangular filter.

use crate::{
    Real,
    analyzer::AnalysisError,
    parameters::{ChannelParam, FilterParameters},
};

/// Channel settings converted to whole sample counts, ready for the filter
/// loops. The CFD scale is dimensionless and is carried through as the
/// integer number of eighths to attenuate by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantizedParameters {
    pub trigger_risetime: usize,
    pub trigger_gap: usize,
    pub cfd_scale: u32,
    pub cfd_delay: usize,
    pub energy_risetime: usize,
    pub energy_gap: usize,
    pub tau: usize,
}

impl QuantizedParameters {
    /// Quantizes raw settings onto the XDT grid.
    ///
    /// The sampling period must be positive and every other setting
    /// non-negative; anything else is rejected before it can poison the
    /// filter arithmetic.
    pub fn from_physical(params: &FilterParameters) -> Result<Self, AnalysisError> {
        if !params.xdt.is_finite() || params.xdt <= 0.0 {
            return Err(AnalysisError::InvalidSamplePeriod(params.xdt));
        }
        for (param, value) in [
            (ChannelParam::TriggerRisetime, params.trigger_risetime),
            (ChannelParam::TriggerFlattop, params.trigger_flattop),
            (ChannelParam::CfdScale, params.cfd_scale),
            (ChannelParam::CfdDelay, params.cfd_delay),
            (ChannelParam::EnergyRisetime, params.energy_risetime),
            (ChannelParam::EnergyFlattop, params.energy_flattop),
            (ChannelParam::Tau, params.tau),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidParameter { param, value });
            }
        }

        Ok(Self {
            trigger_risetime: duration_samples(params.trigger_risetime, params.xdt),
            trigger_gap: gap_samples(params.trigger_flattop, params.xdt),
            cfd_scale: params.cfd_scale.round() as u32,
            cfd_delay: duration_samples(params.cfd_delay, params.xdt),
            energy_risetime: duration_samples(params.energy_risetime, params.xdt),
            energy_gap: gap_samples(params.energy_flattop, params.xdt),
            tau: duration_samples(params.tau, params.xdt),
        })
    }
}

/// Sample count for a rise time, the CFD delay or tau. Values shorter than
/// one sampling period clamp to a single sample; ties round away from zero.
fn duration_samples(value: Real, xdt: Real) -> usize {
    if value < xdt {
        1
    } else {
        (value / xdt).round() as usize
    }
}

/// Sample count for a filter gap. No minimum clamp; ties round away from
/// zero.
fn gap_samples(value: Real, xdt: Real) -> usize {
    (value / xdt).round() as usize
}
