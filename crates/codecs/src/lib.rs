//! MarsLink Codecs - text to bit sequence conversion
//!
//! This crate maps messages onto the bit sequences carried by the channel
//! and back again.

pub mod text;
pub mod error;

pub use error::{CodecError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        text::{Latin1Codec, TextCodec},
        error::{CodecError, Result},
    };
}
