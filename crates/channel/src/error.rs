//! Error types for MarsLink Channel

use thiserror::Error;

/// Channel error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChannelError {
    #[error("Invalid correction parameters: {msg}")]
    InvalidCorrectionParameters { msg: String },

    #[error("Core error: {0}")]
    Core(#[from] marslink_core::CoreError),
}

/// Result type for MarsLink Channel operations
pub type Result<T> = std::result::Result<T, ChannelError>;
