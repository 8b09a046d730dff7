//! Field access for the channel control registers.
//!
//! The parameter store hands registers back as floats, but underneath they
//! are 32-bit patterns. Fields are plain shift/mask arithmetic on the raw
//! value; setters return the modified register so the caller can write it
//! straight back.

const GOOD_CHANNEL: u32 = 2;
const POSITIVE_POLARITY: u32 = 5;
const TRACE_CAPTURE: u32 = 8;
const CFD_TRIGGER: u32 = 10;
const CHANNEL_VALIDATION: u32 = 13;
const HIGH_GAIN: u32 = 14;

const MULTIPLICITY_OFFSET: u32 = 22;
const MULTIPLICITY_MASK: u32 = 0b111;

/// Channel control/status register A (`CHANNEL_CSRA`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelCsra(pub u32);

impl ChannelCsra {
    /// Channel is enabled for data taking.
    pub fn good_channel(self) -> bool {
        self.bit(GOOD_CHANNEL)
    }

    pub fn set_good_channel(self, on: bool) -> Self {
        self.with_bit(GOOD_CHANNEL, on)
    }

    /// Trigger on the positive slope of the input signal.
    pub fn positive_polarity(self) -> bool {
        self.bit(POSITIVE_POLARITY)
    }

    pub fn set_positive_polarity(self, on: bool) -> Self {
        self.with_bit(POSITIVE_POLARITY, on)
    }

    /// Trace acquisition is enabled.
    pub fn trace_capture(self) -> bool {
        self.bit(TRACE_CAPTURE)
    }

    pub fn set_trace_capture(self, on: bool) -> Self {
        self.with_bit(TRACE_CAPTURE, on)
    }

    /// CFD triggering is enabled.
    pub fn cfd_trigger(self) -> bool {
        self.bit(CFD_TRIGGER)
    }

    pub fn set_cfd_trigger(self, on: bool) -> Self {
        self.with_bit(CFD_TRIGGER, on)
    }

    /// Channel validation trigger is required.
    pub fn channel_validation(self) -> bool {
        self.bit(CHANNEL_VALIDATION)
    }

    pub fn set_channel_validation(self, on: bool) -> Self {
        self.with_bit(CHANNEL_VALIDATION, on)
    }

    /// Relative gain is set high.
    pub fn high_gain(self) -> bool {
        self.bit(HIGH_GAIN)
    }

    pub fn set_high_gain(self, on: bool) -> Self {
        self.with_bit(HIGH_GAIN, on)
    }

    fn bit(self, position: u32) -> bool {
        (self.0 >> position) & 1 == 1
    }

    fn with_bit(self, position: u32, on: bool) -> Self {
        if on {
            Self(self.0 | (1 << position))
        } else {
            Self(self.0 & !(1 << position))
        }
    }
}

/// High word of the multiplicity coincidence mask (`MultiplicityMaskH`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MultiplicityMaskHigh(pub u32);

impl MultiplicityMaskHigh {
    /// The 3-bit coincidence multiplicity threshold.
    pub fn threshold(self) -> u32 {
        (self.0 >> MULTIPLICITY_OFFSET) & MULTIPLICITY_MASK
    }

    /// Replaces the threshold field, masking `threshold` to 3 bits.
    pub fn set_threshold(self, threshold: u32) -> Self {
        let cleared = self.0 & !(MULTIPLICITY_MASK << MULTIPLICITY_OFFSET);
        Self(cleared | ((threshold & MULTIPLICITY_MASK) << MULTIPLICITY_OFFSET))
    }
}
