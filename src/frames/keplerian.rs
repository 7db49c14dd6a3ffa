use std::f64::consts::TAU;

use nalgebra::Vector3;

use crate::frames::{FrameError, KeplerianElements, State};

/// Eccentricities at or below this are treated as circular.
pub const CIRCULAR_TOLERANCE: f64 = 1e-10;

/// Maps an arc-cosine result into [0, 2π) using the sign of a quadrant
/// indicator.
fn disambiguate(theta: f64, indicator: f64) -> f64 {
    if indicator < 0.0 {
        (TAU - theta).rem_euclid(TAU)
    } else {
        theta
    }
}

fn acos_clamped(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

fn check_regime(eccentricity: f64) -> Result<(), FrameError> {
    if eccentricity.is_finite() && (0.0..1.0).contains(&eccentricity) {
        Ok(())
    } else {
        Err(FrameError::InvalidRegime { eccentricity })
    }
}

/// Classical elements of an inertial state.
///
/// Degenerate geometries return a value instead of failing:
/// - equatorial orbits (no ascending node) get a node of 0 and their
///   periapsis argument measured from the x-axis;
/// - circular orbits get a periapsis argument of 0 and their true anomaly
///   measured from the node (from the x-axis when also equatorial).
pub fn eci_to_keplerian(state: &State, mu: f64) -> Result<KeplerianElements, FrameError> {
    let position = state.position();
    let velocity = state.velocity();

    let r = position.norm();
    let v = velocity.norm();
    if !state.is_finite() || r == 0.0 {
        return Err(FrameError::Degenerate("position must be finite and non-zero"));
    }
    let radial_velocity = position.dot(velocity) / r;

    let h_vec = position.cross(velocity);
    let h = h_vec.norm();
    if h == 0.0 {
        return Err(FrameError::Degenerate("rectilinear state has no orbital plane"));
    }
    let inclination = acos_clamped(h_vec.z / h);

    let node = Vector3::z().cross(&h_vec);
    let n = node.norm();
    let equatorial = n == 0.0;
    // retrograde equatorial orbits measure angles clockwise from the x-axis
    let spin = if h_vec.z < 0.0 { -1.0 } else { 1.0 };

    let ascending_node = if equatorial {
        0.0
    } else {
        disambiguate(acos_clamped(node.x / n), node.y)
    };

    let e_vec = ((v * v - mu / r) * position - r * radial_velocity * velocity) / mu;
    let eccentricity = e_vec.norm();
    check_regime(eccentricity)?;
    let circular = eccentricity <= CIRCULAR_TOLERANCE;

    let periapsis_argument = if circular {
        0.0
    } else if equatorial {
        (spin * e_vec.y).atan2(e_vec.x).rem_euclid(TAU)
    } else {
        disambiguate(acos_clamped(node.dot(&e_vec) / (n * eccentricity)), e_vec.z)
    };

    let true_anomaly = if !circular {
        disambiguate(
            acos_clamped(e_vec.dot(position) / (eccentricity * r)),
            radial_velocity,
        )
    } else if equatorial {
        (spin * position.y).atan2(position.x).rem_euclid(TAU)
    } else {
        disambiguate(
            acos_clamped(node.dot(position) / (n * r)),
            node.cross(position).z,
        )
    };

    let semi_major_axis = h * h / mu / (1.0 - eccentricity * eccentricity);

    Ok(KeplerianElements {
        semi_major_axis,
        eccentricity,
        inclination,
        periapsis_argument,
        ascending_node,
        true_anomaly,
    })
}

/// Perifocal (Gaussian) unit vectors P (towards periapsis) and Q.
pub fn perifocal_basis(
    inclination: f64,
    periapsis_argument: f64,
    ascending_node: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let (sin_i, cos_i) = inclination.sin_cos();
    let (sin_w, cos_w) = periapsis_argument.sin_cos();
    let (sin_o, cos_o) = ascending_node.sin_cos();

    let p = Vector3::new(
        cos_o * cos_w - sin_o * cos_i * sin_w,
        sin_o * cos_w + cos_o * cos_i * sin_w,
        sin_i * sin_w,
    );
    let q = Vector3::new(
        -cos_o * sin_w - sin_o * cos_i * cos_w,
        cos_o * cos_i * cos_w - sin_o * sin_w,
        sin_i * cos_w,
    );
    (p, q)
}

pub fn keplerian_to_eci(elements: &KeplerianElements, mu: f64) -> Result<State, FrameError> {
    let KeplerianElements {
        semi_major_axis: a,
        eccentricity: e,
        inclination,
        periapsis_argument,
        ascending_node,
        true_anomaly: nu,
    } = *elements;
    check_regime(e)?;

    let (p_vec, q_vec) = perifocal_basis(inclination, periapsis_argument, ascending_node);

    let semi_latus = a * (1.0 - e * e);
    let r = semi_latus / (1.0 + e * nu.cos());
    let x = r * nu.cos();
    let y = r * nu.sin();
    let position = x * p_vec + y * q_vec;

    let root = (1.0 - e * e).sqrt();
    let cos_e = x / a + e;
    let sin_e = y / (a * root);
    let f = (a * mu).sqrt() / r;
    let velocity = -f * sin_e * p_vec + f * root * cos_e * q_vec;

    Ok(State::new(position, velocity))
}
