//! MarsLink Core - bit sequences and analytic models
//!
//! This crate provides the bit sequence type shared by the codec and the
//! channel, the caller-supplied channel parameters, and the two pure models
//! used for reporting: channel capacity and light-time comparison.

pub mod bits;
pub mod capacity;
pub mod params;
pub mod timing;
pub mod error;

pub use error::{CoreError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        bits::{BitSequence, BITS_PER_CHAR},
        capacity::{binary_entropy, capacity, capacity_for, CapacityResult},
        params::ChannelParameters,
        timing::{propagation_time, speedup, TimingReport, SPEED_OF_LIGHT_KM_S},
        error::{CoreError, Result},
    };
}
