//! MarsLink Channel - noisy channel model and error correction
//!
//! This crate provides the binary symmetric channel that carries bits one
//! at a time, and the correction schemes applied on either side of it.

pub mod bsc;
pub mod fec;
pub mod error;

pub use error::{ChannelError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        bsc::{BinarySymmetricChannel, BitPair, Transmit},
        fec::{correct, Correction, CorrectionScheme, Corrector, ErrorStats, FecDecoder, FecEncoder, RepetitionCode},
        error::{ChannelError, Result},
    };
}
