use serde::{Deserialize, Serialize};

pub const MU_KM3_S2: f64 = 398_600.4415;
pub const EQUATORIAL_RADIUS_KM: f64 = 6378.0;
pub const POLAR_RADIUS_KM: f64 = 6356.0;

pub const J2_MU_KM3_S2: f64 = 398_600.4418;
pub const J2_EQUATORIAL_RADIUS_KM: f64 = 6378.1363;
/// Fully normalised C20 geopotential coefficient.
pub const C20_NORMALIZED: f64 = -0.000_484_165_371_173_6;

/// Two-body constants shared by the frame conversions, the Kepler
/// propagator and the monopole integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarthModel {
    pub mu: f64,
    pub equatorial_radius_km: f64,
    pub polar_radius_km: f64,
}

impl Default for EarthModel {
    fn default() -> Self {
        Self {
            mu: MU_KM3_S2,
            equatorial_radius_km: EQUATORIAL_RADIUS_KM,
            polar_radius_km: POLAR_RADIUS_KM,
        }
    }
}

impl EarthModel {
    /// Spherical-Earth radius used for geodetic heights and lattice sites.
    pub fn mean_radius_km(&self) -> f64 {
        (self.equatorial_radius_km + self.polar_radius_km) / 2.0
    }
}

/// Constants of the oblate gravity model. These differ from `EarthModel`
/// (μ and equatorial radius come from a different reference) and are kept
/// apart on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct J2Model {
    pub mu: f64,
    pub equatorial_radius_km: f64,
    pub c20_normalized: f64,
}

impl Default for J2Model {
    fn default() -> Self {
        Self {
            mu: J2_MU_KM3_S2,
            equatorial_radius_km: J2_EQUATORIAL_RADIUS_KM,
            c20_normalized: C20_NORMALIZED,
        }
    }
}

impl J2Model {
    /// Denormalised C20, i.e. C̄20 / sqrt(1/5).
    pub fn c20(&self) -> f64 {
        self.c20_normalized / (1.0_f64 / 5.0).sqrt()
    }

    /// Same constants with the oblateness term switched off.
    pub fn spherical(&self) -> Self {
        Self {
            c20_normalized: 0.0,
            ..*self
        }
    }
}
