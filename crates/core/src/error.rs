//! Error types for MarsLink Core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{name} = {value} is outside its valid domain {domain}")]
    DomainViolation {
        name: &'static str,
        value: f64,
        domain: &'static str,
    },

    #[error("Invalid bit value {value} at position {position}")]
    InvalidBit { value: u8, position: usize },
}

impl CoreError {
    pub(crate) fn domain(name: &'static str, value: f64, domain: &'static str) -> Self {
        CoreError::DomainViolation { name, value, domain }
    }
}

/// Result type for MarsLink Core operations
pub type Result<T> = std::result::Result<T, CoreError>;
