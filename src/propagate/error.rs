use thiserror::Error;

use crate::frames::FrameError;

#[derive(Debug, Error, PartialEq)]
pub enum PropagateError {
    #[error("frame conversion failed: {0}")]
    Frame(#[from] FrameError),
    #[error("kepler equation did not converge (M = {mean_anomaly}, e = {eccentricity})")]
    NotConverged { mean_anomaly: f64, eccentricity: f64 },
    #[error("integration produced a non-finite state")]
    NonFinite,
    #[error("time step must be finite, got {0}")]
    InvalidStep(f64),
}
