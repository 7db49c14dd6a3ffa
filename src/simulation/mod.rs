mod driver;
mod error;
mod loader;
mod trajectory;

pub use driver::Simulator;
pub use error::{LoadError, SimulationError};
pub use loader::SpacecraftState;
pub use trajectory::{EcefTrack, Trajectory};
