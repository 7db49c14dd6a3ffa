use std::f64::consts::TAU;

use nalgebra::Vector3;

use crate::earth::EarthModel;
use crate::frames::{eci_to_keplerian, perifocal_basis, State};
use crate::propagate::{solve_kepler, PropagateError, Propagator, PropagatorKind};

/// Analytic two-body propagation through Kepler's equation.
#[derive(Debug, Clone, Copy)]
pub struct KeplerPropagator {
    earth: EarthModel,
}

impl KeplerPropagator {
    pub fn new(earth: EarthModel) -> Self {
        Self { earth }
    }
}

impl Propagator for KeplerPropagator {
    fn label(&self) -> &str {
        "kepler"
    }

    fn step(&self, state: &State, dt: f64) -> Result<State, PropagateError> {
        if !dt.is_finite() {
            return Err(PropagateError::InvalidStep(dt));
        }
        let mu = self.earth.mu;
        let elements = eci_to_keplerian(state, mu)?;
        let a = elements.semi_major_axis;
        let e = elements.eccentricity;
        let nu = elements.true_anomaly;
        let r = state.position().norm();
        let root = (1.0 - e * e).sqrt();

        let mean_motion = (mu / a.powi(3)).sqrt();
        let cos_e0 = r * nu.cos() / a + e;
        let sin_e0 = r * nu.sin() / (a * root);
        let mut e0 = sin_e0.atan2(cos_e0);
        if e0 <= 0.0 {
            e0 += TAU;
        }
        let m0 = e0 - e * e0.sin();
        let big_e = solve_kepler(m0 + mean_motion * dt, e)?;

        let (p, q) = perifocal_basis(
            elements.inclination,
            elements.periapsis_argument,
            elements.ascending_node,
        );
        let (sin_big_e, cos_big_e) = big_e.sin_cos();

        let position = a * (cos_big_e - e) * p + a * root * sin_big_e * q;

        let radius = a * (1.0 - e * cos_big_e);
        let scale = (a * mu).sqrt() / radius;
        let velocity: Vector3<f64> = -scale * sin_big_e * p + scale * root * cos_big_e * q;

        Ok(State::new(position, velocity))
    }
}
