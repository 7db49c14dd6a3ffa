use nalgebra::Vector3;

use crate::earth::EarthModel;
use crate::frames::{Enu, Geodetic};

/// Spherical-Earth geodetic coordinates of an ECEF position. No iterative
/// ellipsoid correction is applied.
pub fn ecef_to_geodetic(ecef: &Vector3<f64>, earth: &EarthModel) -> Geodetic {
    let horizontal = ecef.x.hypot(ecef.y);
    Geodetic {
        latitude: ecef.z.atan2(horizontal),
        longitude: ecef.y.atan2(ecef.x),
        height_km: ecef.norm() - earth.mean_radius_km(),
    }
}

/// Surface point (zero height) on the mean-radius sphere.
pub fn geodetic_to_ecef(latitude: f64, longitude: f64, earth: &EarthModel) -> Vector3<f64> {
    let r = earth.mean_radius_km();
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Vector3::new(r * cos_lat * cos_lon, r * cos_lat * sin_lon, r * sin_lat)
}

pub fn topocentric_basis(latitude: f64, longitude: f64) -> Enu {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Enu {
        east: Vector3::new(-sin_lon, cos_lon, 0.0),
        north: Vector3::new(-cos_lon * sin_lat, -sin_lon * sin_lat, cos_lat),
        up: Vector3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat),
    }
}

/// Components (e, n, u) of an ECEF vector in the given local basis.
pub fn project_onto_basis(v: &Vector3<f64>, basis: &Enu) -> Vector3<f64> {
    Vector3::new(v.dot(&basis.east), v.dot(&basis.north), v.dot(&basis.up))
}
