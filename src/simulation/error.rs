use thiserror::Error;

use crate::propagate::PropagateError;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("propagation failed at step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: PropagateError,
    },
    #[error("invalid time step: {0}")]
    InvalidStep(f64),
    #[error("a trajectory needs at least one state")]
    Empty,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed state: {0}")]
    Malformed(String),
    #[error("unrecognised timestamp {0:?}")]
    Timestamp(String),
}
