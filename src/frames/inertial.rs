use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::frames::{rotate_z, FrameError, Hcl, State};

/// Unix timestamp of 2000-01-01T12:00:00Z.
const J2000_UNIX_SECONDS: i64 = 946_728_000;
const SECONDS_PER_DAY: f64 = 86_400.0;

const GMST_AT_J2000_RAD: f64 = 4.894_960_892_1;
const EARTH_ROTATION_RAD_PER_DAY: f64 = 6.300_388_098_967_757_4;

/// Signed fractional days between `epoch` and 2000-01-01T12:00:00 UTC.
pub fn days_since_j2000(epoch: &DateTime<Utc>) -> f64 {
    let whole = (epoch.timestamp() - J2000_UNIX_SECONDS) as f64;
    let fraction = f64::from(epoch.timestamp_subsec_nanos()) * 1e-9;
    (whole + fraction) / SECONDS_PER_DAY
}

/// Accumulated Earth rotation angle θg (radians, not wrapped).
pub fn greenwich_sidereal_angle(epoch: &DateTime<Utc>) -> f64 {
    GMST_AT_J2000_RAD + EARTH_ROTATION_RAD_PER_DAY * days_since_j2000(epoch)
}

/// Inertial position to Earth-fixed position at `epoch`.
pub fn eci_to_ecef(position: &Vector3<f64>, epoch: &DateTime<Utc>) -> Vector3<f64> {
    rotate_z(greenwich_sidereal_angle(epoch), position)
}

pub fn hcl_basis(state: &State) -> Result<Hcl, FrameError> {
    let r = state.position();
    let h = r.cross(state.velocity());
    if r.norm() == 0.0 || h.norm() == 0.0 {
        return Err(FrameError::Degenerate("rectilinear state has no orbital plane"));
    }
    let height = r.normalize();
    let cross_track = h.normalize();
    Ok(Hcl {
        height,
        cross_track,
        along_track: height.cross(&cross_track),
    })
}
