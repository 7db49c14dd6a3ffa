mod error;
mod kepler;
mod kepler_solver;
mod rk4;
mod types;

pub use error::PropagateError;
pub use kepler::KeplerPropagator;
pub use kepler_solver::{kepler_residual, solve_kepler, KEPLER_TOLERANCE};
pub use rk4::{Gravity, J2Gravity, Monopole, Rk4Propagator};
pub use types::{Propagator, PropagatorKind};
