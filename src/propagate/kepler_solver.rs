use std::f64::consts::PI;

use crate::frames::FrameError;
use crate::propagate::PropagateError;

pub const KEPLER_TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 100;

/// E - e·sin(E) - M
pub fn kepler_residual(eccentric_anomaly: f64, mean_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin() - mean_anomaly
}

/// Newton-Raphson solution of Kepler's equation for the eccentric anomaly.
///
/// Starts from π for e > 0.8 and from M otherwise. Only elliptical orbits
/// (0 <= e < 1) are accepted.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, PropagateError> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(FrameError::InvalidRegime { eccentricity }.into());
    }
    if !mean_anomaly.is_finite() {
        return Err(PropagateError::NotConverged {
            mean_anomaly,
            eccentricity,
        });
    }

    let mut e_anomaly = if eccentricity > 0.8 { PI } else { mean_anomaly };
    for _ in 0..MAX_ITERATIONS {
        let residual = kepler_residual(e_anomaly, mean_anomaly, eccentricity);
        if residual.abs() < KEPLER_TOLERANCE {
            return Ok(e_anomaly);
        }
        e_anomaly -= residual / (1.0 - eccentricity * e_anomaly.cos());
    }

    Err(PropagateError::NotConverged {
        mean_anomaly,
        eccentricity,
    })
}
