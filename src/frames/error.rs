use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("invalid orbital regime: eccentricity {eccentricity} is outside [0, 1)")]
    InvalidRegime { eccentricity: f64 },
    #[error("degenerate state: {0}")]
    Degenerate(&'static str),
}
