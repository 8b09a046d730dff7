//! The digital filters the signal processor runs in firmware.
//!
//! The fast filter and the CFD follow the Pixie-16 User's Manual
//! Sec. 3.3.8.1 (Eqs. 3-1 and 3-2); the slow filter is the pole-zero
//! corrected trapezoid of H. Tan et al., IEEE Trans. Nucl. Sci. 51, 1541
//! (2004). Every filter leaves elements it cannot fill at zero, so each
//! output is exactly as long as the trace it came from.

pub mod baseline;
pub mod cfd;
pub mod fast;
pub mod slow;

pub use baseline::{BASELINE_SAMPLES, estimate_baseline};
pub use cfd::cfd;
pub use fast::fast_filter;
pub use slow::slow_filter;
