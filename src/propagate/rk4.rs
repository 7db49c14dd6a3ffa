use nalgebra::Vector3;

use crate::earth::J2Model;
use crate::frames::State;
use crate::propagate::{PropagateError, Propagator, PropagatorKind};

/// Position-only gravitational acceleration (km/s²).
pub trait Gravity: Send + Sync {
    fn acceleration(&self, position: &Vector3<f64>) -> Vector3<f64>;
}

/// Point-mass gravity.
#[derive(Debug, Clone, Copy)]
pub struct Monopole {
    pub mu: f64,
}

impl Gravity for Monopole {
    fn acceleration(&self, position: &Vector3<f64>) -> Vector3<f64> {
        let r = position.norm();
        -self.mu / r.powi(3) * position
    }
}

/// Point-mass gravity plus the C20 zonal term.
#[derive(Debug, Clone, Copy)]
pub struct J2Gravity(pub J2Model);

impl Gravity for J2Gravity {
    fn acceleration(&self, position: &Vector3<f64>) -> Vector3<f64> {
        let J2Model {
            mu,
            equatorial_radius_km,
            ..
        } = self.0;
        let c20 = self.0.c20();
        let r = position.norm();
        let r2 = r * r;
        let z2 = position.z * position.z;

        let central = -mu / r.powi(3);
        let zonal = 1.5 * mu * equatorial_radius_km.powi(2) / r.powi(5) * c20;
        let planar = central + zonal * (1.0 - 5.0 * z2 / r2);
        let axial = central + zonal * (3.0 - 5.0 * z2 / r2);

        Vector3::new(planar * position.x, planar * position.y, axial * position.z)
    }
}

/// Fourth-order Runge-Kutta-Nyström integrator for r'' = a(r).
///
/// Every slope is a displacement term k = h²/2 · a. The second and third
/// stages are evaluated at the same point because the acceleration does
/// not depend on velocity, so k3 = k2.
#[derive(Debug, Clone)]
pub struct Rk4Propagator<G> {
    label: String,
    gravity: G,
}

impl<G: Gravity> Rk4Propagator<G> {
    pub fn new(kind: PropagatorKind, gravity: G) -> Self {
        Self {
            label: kind.to_string(),
            gravity,
        }
    }

    fn slope(&self, h: f64, position: &Vector3<f64>) -> Vector3<f64> {
        0.5 * h * h * self.gravity.acceleration(position)
    }
}

impl<G: Gravity> Propagator for Rk4Propagator<G> {
    fn label(&self) -> &str {
        &self.label
    }

    fn step(&self, state: &State, h: f64) -> Result<State, PropagateError> {
        if !h.is_finite() {
            return Err(PropagateError::InvalidStep(h));
        }
        if h == 0.0 {
            return Ok(*state);
        }
        let r = state.position();
        let v = state.velocity();

        let k1 = self.slope(h, r);
        let k2 = self.slope(h, &(r + 0.5 * h * v + k1 / 4.0));
        let k3 = k2;
        let k4 = self.slope(h, &(r + h * v + k3));

        let position = r + h * v + (k1 + k2 + k3) / 3.0;
        let velocity = v + (k1 + 2.0 * k2 + 2.0 * k3 + k4) / (3.0 * h);

        let next = State::new(position, velocity);
        if next.is_finite() {
            Ok(next)
        } else {
            Err(PropagateError::NonFinite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earth::{EarthModel, MU_KM3_S2};
    use crate::frames::eci_to_keplerian;
    use crate::propagate::KeplerPropagator;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{PI, TAU};

    fn circular(inclination: f64) -> State {
        let r = 7_000.0;
        let v = (MU_KM3_S2 / r).sqrt();
        State::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, v * inclination.cos(), v * inclination.sin()),
        )
    }

    fn run(propagator: &dyn Propagator, start: State, h: f64, steps: usize) -> State {
        (0..steps).fold(start, |s, _| propagator.step(&s, h).unwrap())
    }

    fn error_against_kepler(propagator: &dyn Propagator, h: f64) -> f64 {
        let duration = 1_200.0;
        let start = circular(0.9);
        let exact = KeplerPropagator::new(EarthModel::default())
            .step(&start, duration)
            .unwrap();
        let approx = run(propagator, start, h, (duration / h) as usize);
        (approx.position() - exact.position()).norm()
    }

    #[test]
    fn monopole_converges_to_analytic_solution() {
        let rk4 = Rk4Propagator::new(PropagatorKind::Rk4Monopole, Monopole { mu: MU_KM3_S2 });
        let coarse = error_against_kepler(&rk4, 20.0);
        let fine = error_against_kepler(&rk4, 10.0);
        assert!(fine < 1e-5, "fine error {fine}");
        // fourth order: halving the step divides the error by ~16
        assert!(coarse / fine > 10.0, "ratio {}", coarse / fine);
    }

    #[test]
    fn j2_without_oblateness_converges_to_analytic_solution() {
        let model = J2Model {
            mu: MU_KM3_S2,
            ..J2Model::default().spherical()
        };
        let rk4 = Rk4Propagator::new(PropagatorKind::Rk4J2, J2Gravity(model));
        let coarse = error_against_kepler(&rk4, 20.0);
        let fine = error_against_kepler(&rk4, 10.0);
        assert!(fine < 1e-5, "fine error {fine}");
        assert!(coarse < 1e-3);
        assert!(coarse / fine > 10.0);
    }

    #[test]
    fn spherical_j2_model_matches_monopole_field() {
        let model = J2Model::default().spherical();
        let r = Vector3::new(-1_366.1, 3_108.4, 6_802.0);
        let j2 = J2Gravity(model).acceleration(&r);
        let mono = Monopole { mu: model.mu }.acceleration(&r);
        assert_abs_diff_eq!(j2, mono, epsilon = 1e-15);
    }

    #[test]
    fn oblateness_regresses_prograde_node() {
        let rk4 = Rk4Propagator::new(PropagatorKind::Rk4J2, J2Gravity(J2Model::default()));
        let start = circular(0.9);
        let period = TAU * (7_000.0_f64.powi(3) / MU_KM3_S2).sqrt();
        let end = run(&rk4, start, period / 600.0, 600);

        let before = eci_to_keplerian(&start, MU_KM3_S2).unwrap().ascending_node;
        let after = eci_to_keplerian(&end, MU_KM3_S2).unwrap().ascending_node;
        let drift = (after - before + PI).rem_euclid(TAU) - PI;
        // secular rate -3/2 n J2 (Re/p)² cos i over one orbit ≈ -5.27e-3 rad
        assert!(drift < -4.5e-3 && drift > -6.0e-3, "drift {drift}");
    }

    #[test]
    fn zero_step_returns_input() {
        let rk4 = Rk4Propagator::new(PropagatorKind::Rk4Monopole, Monopole { mu: MU_KM3_S2 });
        let start = circular(0.3);
        assert_eq!(rk4.step(&start, 0.0).unwrap(), start);
    }

    #[test]
    fn collapse_to_origin_is_reported() {
        let rk4 = Rk4Propagator::new(PropagatorKind::Rk4Monopole, Monopole { mu: MU_KM3_S2 });
        let start = State::new(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(rk4.step(&start, 10.0), Err(PropagateError::NonFinite));
    }
}
