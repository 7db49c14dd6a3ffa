use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Cartesian position (km) and velocity (km/s).
///
/// A state is a plain value: once produced it is only ever copied, never
/// changed in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
}

impl State {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }
}

/// Classical orbital elements. Angles in radians, `semi_major_axis` in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeplerianElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub periapsis_argument: f64,
    pub ascending_node: f64,
    pub true_anomaly: f64,
}

/// Latitude and longitude in radians, height in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub height_km: f64,
}

/// East/North/Up unit vectors expressed in ECEF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enu {
    pub east: Vector3<f64>,
    pub north: Vector3<f64>,
    pub up: Vector3<f64>,
}

/// Height/Cross-track/Along-track unit vectors of an orbital state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hcl {
    pub height: Vector3<f64>,
    pub cross_track: Vector3<f64>,
    pub along_track: Vector3<f64>,
}

impl Hcl {
    /// Components of `v` along (h, c, l).
    pub fn project(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            v.dot(&self.height),
            v.dot(&self.cross_track),
            v.dot(&self.along_track),
        )
    }
}
