//! Sample-by-sample differences between two trajectories.

use nalgebra::Vector3;

use crate::frames::{hcl_basis, project_onto_basis, FrameError};
use crate::simulation::{EcefTrack, Trajectory};
use crate::station::GroundStation;

/// Position of `a` minus position of `b` at each sample, expressed along the
/// height, cross-track and along-track axes of `a`. Stops at the shorter
/// series.
pub fn hcl_differences(a: &Trajectory, b: &Trajectory) -> Result<Vec<Vector3<f64>>, FrameError> {
    a.states()
        .iter()
        .zip(b.states())
        .map(|(reference, other)| -> Result<_, FrameError> {
            let basis = hcl_basis(reference)?;
            Ok(basis.project(&(reference.position() - other.position())))
        })
        .collect()
}

/// Earth-fixed position differences `a − b` seen in a station's
/// East/North/Up frame.
pub fn topocentric_differences(
    a: &EcefTrack,
    b: &EcefTrack,
    station: &GroundStation,
) -> Vec<Vector3<f64>> {
    a.positions()
        .iter()
        .zip(b.positions())
        .map(|(pa, pb)| project_onto_basis(&(pa - pb), station.enu()))
        .collect()
}
