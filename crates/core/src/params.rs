//! Channel parameters supplied by the caller

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Coupling point at which the efficiency curve peaks
pub const IDEAL_LAMBDA: f64 = 1.0;
pub const IDEAL_KAPPA: f64 = 0.15;

/// Parameters for one transmission.
///
/// Read-only to the simulation once a transmission has started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelParameters {
    pub error_probability: f64,
    pub lambda: f64,
    pub kappa: f64,
    pub correction_enabled: bool,
}

impl ChannelParameters {
    /// Create validated parameters
    pub fn new(
        error_probability: f64,
        lambda: f64,
        kappa: f64,
        correction_enabled: bool,
    ) -> Result<Self> {
        let params = Self {
            error_probability,
            lambda,
            kappa,
            correction_enabled,
        };
        params.validate()?;
        Ok(params)
    }

    /// Noiseless channel at the ideal coupling point
    pub fn ideal() -> Self {
        Self {
            error_probability: 0.0,
            lambda: IDEAL_LAMBDA,
            kappa: IDEAL_KAPPA,
            correction_enabled: true,
        }
    }

    /// Check every field against its domain
    pub fn validate(&self) -> Result<()> {
        check_probability("error_probability", self.error_probability)?;
        check_finite("lambda", self.lambda)?;
        check_finite("kappa", self.kappa)?;
        Ok(())
    }

    /// Set the coupling parameters
    pub fn with_coupling(mut self, lambda: f64, kappa: f64) -> Result<Self> {
        check_finite("lambda", lambda)?;
        check_finite("kappa", kappa)?;
        self.lambda = lambda;
        self.kappa = kappa;
        Ok(self)
    }
}

impl Default for ChannelParameters {
    fn default() -> Self {
        Self {
            error_probability: 0.05,
            lambda: IDEAL_LAMBDA,
            kappa: IDEAL_KAPPA,
            correction_enabled: true,
        }
    }
}

/// Reject probabilities outside [0, 1], including NaN
pub fn check_probability(name: &'static str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(CoreError::domain(name, p, "[0, 1]"));
    }
    Ok(())
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CoreError::domain(name, value, "finite reals"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ChannelParameters::default().validate().is_ok());
        assert!(ChannelParameters::ideal().validate().is_ok());
    }

    #[test]
    fn test_probability_out_of_range() {
        assert!(ChannelParameters::new(1.5, 1.0, 0.15, true).is_err());
        assert!(ChannelParameters::new(-0.01, 1.0, 0.15, true).is_err());
        assert!(ChannelParameters::new(f64::NAN, 1.0, 0.15, true).is_err());
        assert!(ChannelParameters::new(1.0, 1.0, 0.15, true).is_ok());
    }

    #[test]
    fn test_non_finite_coupling() {
        let params = ChannelParameters::default();
        assert!(params.with_coupling(f64::INFINITY, 0.15).is_err());
        assert!(params.with_coupling(2.0, -0.3).is_ok());
    }
}
