//! Error types for MarsLink Codecs

use thiserror::Error;

/// Codec error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Character {character:?} (U+{code:04X}) at position {position} does not fit in 8 bits")]
    UnrepresentableCharacter {
        character: char,
        code: u32,
        position: usize,
    },
}

/// Result type for MarsLink Codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
