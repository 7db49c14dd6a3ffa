mod error;
mod geodetic;
mod inertial;
mod keplerian;
mod rotation;
mod types;

pub use error::FrameError;
pub use geodetic::{ecef_to_geodetic, geodetic_to_ecef, project_onto_basis, topocentric_basis};
pub use inertial::{days_since_j2000, eci_to_ecef, greenwich_sidereal_angle, hcl_basis};
pub use keplerian::{eci_to_keplerian, keplerian_to_eci, perifocal_basis, CIRCULAR_TOLERANCE};
pub use rotation::{rotate_x, rotate_z};
pub use types::{Enu, Geodetic, Hcl, KeplerianElements, State};
