pub mod registers;

pub type ModuleId = u16;
pub type ChannelId = u16;
pub type Intensity = u16;

/// Longest ADC trace a channel can capture, in samples.
pub const MAX_ADC_TRACE_LEN: usize = 8192;

pub const CHANNELS_PER_MODULE: usize = 16;
