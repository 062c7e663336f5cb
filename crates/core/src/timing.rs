//! Light-time baseline for comparing against the simulated link

use crate::params::check_finite;
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Speed of light in vacuum, km/s
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Mean Earth-Mars distance, km
pub const MARS_MEAN_DISTANCE_KM: f64 = 225_000_000.0;

/// Fixed end-to-end time reported for the simulated link, seconds
pub const SIMULATED_TRANSMISSION_TIME_S: f64 = 0.001;

/// Time for a signal to cover `distance_km` at `speed_km_s`
pub fn propagation_time(distance_km: f64, speed_km_s: f64) -> Result<f64> {
    check_finite("distance_km", distance_km)?;
    if distance_km < 0.0 {
        return Err(CoreError::domain("distance_km", distance_km, "[0, inf)"));
    }
    if !(speed_km_s.is_finite() && speed_km_s > 0.0) {
        return Err(CoreError::domain("speed_km_s", speed_km_s, "(0, inf)"));
    }

    Ok(distance_km / speed_km_s)
}

/// Ratio of the light-time baseline to the simulated time
pub fn speedup(baseline_s: f64, simulated_s: f64) -> Result<f64> {
    if !(simulated_s.is_finite() && simulated_s > 0.0) {
        return Err(CoreError::domain("simulated_time", simulated_s, "(0, inf)"));
    }
    Ok(baseline_s / simulated_s)
}

/// Light-time comparison for one distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingReport {
    pub distance_km: f64,
    pub propagation_time_s: f64,
    pub simulated_time_s: f64,
    pub speedup: f64,
}

impl TimingReport {
    /// Compare light time over `distance_km` against the simulated link time
    pub fn new(distance_km: f64) -> Result<Self> {
        let propagation_time_s = propagation_time(distance_km, SPEED_OF_LIGHT_KM_S)?;
        let speedup = speedup(propagation_time_s, SIMULATED_TRANSMISSION_TIME_S)?;

        Ok(Self {
            distance_km,
            propagation_time_s,
            simulated_time_s: SIMULATED_TRANSMISSION_TIME_S,
            speedup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mars_light_time() {
        let t = propagation_time(MARS_MEAN_DISTANCE_KM, SPEED_OF_LIGHT_KM_S).unwrap();
        // Roughly 12.5 minutes
        assert!((t - 750.52).abs() < 0.01);
    }

    #[test]
    fn test_zero_distance() {
        assert_eq!(propagation_time(0.0, SPEED_OF_LIGHT_KM_S).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(propagation_time(-1.0, SPEED_OF_LIGHT_KM_S).is_err());
        assert!(propagation_time(1.0, 0.0).is_err());
        assert!(propagation_time(f64::NAN, 1.0).is_err());
        assert!(speedup(10.0, 0.0).is_err());
    }

    #[test]
    fn test_report() {
        let report = TimingReport::new(SPEED_OF_LIGHT_KM_S).unwrap();
        assert!((report.propagation_time_s - 1.0).abs() < 1e-12);
        assert!((report.speedup - 1000.0).abs() < 1e-9);
        assert_eq!(report.simulated_time_s, SIMULATED_TRANSMISSION_TIME_S);
    }
}
