//! Offline computation of the digitiser's filter responses for a captured
//! ADC trace.
//!
//! Given one channel's trace and that channel's DSP settings fetched from a
//! [`ParameterStore`], [`analyze`] reproduces the three signals the signal
//! processor derives in firmware: the fast (trigger) filter, the CFD timing
//! signal and the pole-zero corrected slow (energy) filter. Everything here
//! is pure computation on already-captured data; nothing touches hardware,
//! and nothing is written back to the module.

pub mod analyzer;
pub mod filters;
pub mod parameters;
pub mod quantize;
pub mod validation;

pub use analyzer::{AnalysisError, FilterOutput, analyze};
pub use parameters::{
    ChannelParam, FilterParameters, MemoryParameterStore, ParameterStore, StoreError,
};
pub use quantize::QuantizedParameters;

/// Fractional filter amplitudes and baseline values.
pub type Real = f64;

/// Running sums of ADC samples. Signed, as filter differences go negative.
pub type FilterValue = i64;
