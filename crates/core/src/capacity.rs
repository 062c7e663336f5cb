//! Binary entropy and channel capacity estimation
//!
//! The theoretical figure is the capacity of a binary symmetric channel,
//! `1 - H(p)`. The practical figure scales it by a smooth efficiency bump
//! centred on the ideal coupling point `(lambda, kappa) = (1.0, 0.15)`,
//! falling towards 0.5 away from it. That curve is a modelling device, not a
//! physical law.

use crate::params::{check_finite, check_probability, ChannelParameters, IDEAL_KAPPA, IDEAL_LAMBDA};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Width of the efficiency bump
const EFFICIENCY_SPREAD: f64 = 0.5;

/// Efficiency retained when no error correction is applied
pub const UNCORRECTED_PENALTY: f64 = 0.7;

/// Theoretical and practical capacity, both in [0, 1] bits per channel use
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityResult {
    pub theoretical: f64,
    pub practical: f64,
}

/// Entropy in bits of a Bernoulli(p) variable
pub fn binary_entropy(p: f64) -> Result<f64> {
    check_probability("p", p)?;

    if p == 0.0 || p == 1.0 {
        return Ok(0.0);
    }

    let q = 1.0 - p;
    Ok(-p * p.log2() - q * q.log2())
}

/// Efficiency factor in (0.5, 1] for the given coupling parameters
pub fn parameter_efficiency(lambda: f64, kappa: f64) -> Result<f64> {
    check_finite("lambda", lambda)?;
    check_finite("kappa", kappa)?;

    let distance_sq = (lambda - IDEAL_LAMBDA).powi(2) + (kappa - IDEAL_KAPPA).powi(2);
    Ok(0.5 + 0.5 * (-distance_sq / EFFICIENCY_SPREAD).exp())
}

/// Capacity for the given channel settings
pub fn capacity(
    error_probability: f64,
    lambda: f64,
    kappa: f64,
    correction_enabled: bool,
) -> Result<CapacityResult> {
    // Rounding can push H(p) a hair above 1 near p = 0.5
    let theoretical = (1.0 - binary_entropy(error_probability)?).clamp(0.0, 1.0);

    let mut practical = theoretical * parameter_efficiency(lambda, kappa)?;
    if !correction_enabled {
        practical *= UNCORRECTED_PENALTY;
    }

    Ok(CapacityResult {
        theoretical,
        practical: practical.clamp(0.0, 1.0),
    })
}

/// Capacity for a parameter set
pub fn capacity_for(params: &ChannelParameters) -> Result<CapacityResult> {
    capacity(
        params.error_probability,
        params.lambda,
        params.kappa,
        params.correction_enabled,
    )
}
