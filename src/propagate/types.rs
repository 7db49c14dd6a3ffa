use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::earth::{EarthModel, J2Model};
use crate::frames::State;
use crate::propagate::{J2Gravity, KeplerPropagator, Monopole, PropagateError, Rk4Propagator};

/// One-step state advance. Implementations hold no state between calls.
pub trait Propagator: Send + Sync {
    /// Identifies the dynamical model in trajectories and cache keys.
    fn label(&self) -> &str;

    fn step(&self, state: &State, dt: f64) -> Result<State, PropagateError>;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PropagatorKind {
    Kepler,
    Rk4Monopole,
    Rk4J2,
}

impl PropagatorKind {
    pub fn build(self, earth: &EarthModel, j2: &J2Model) -> Box<dyn Propagator> {
        match self {
            PropagatorKind::Kepler => Box::new(KeplerPropagator::new(*earth)),
            PropagatorKind::Rk4Monopole => Box::new(Rk4Propagator::new(
                PropagatorKind::Rk4Monopole,
                Monopole { mu: earth.mu },
            )),
            PropagatorKind::Rk4J2 => {
                Box::new(Rk4Propagator::new(PropagatorKind::Rk4J2, J2Gravity(*j2)))
            }
        }
    }
}
