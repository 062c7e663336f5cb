//! MarsLink Tools library

pub mod session;
pub mod config;
pub mod common;

pub use session::{Session, SessionState, TransmissionReport, TransmissionState};
pub use config::{ConfigOverrides, SimConfig};
pub use common::{GlobalConfig, ProgressReporter};
