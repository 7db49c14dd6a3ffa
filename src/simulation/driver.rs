use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::cache::ResultCache;
use crate::frames::State;
use crate::propagate::Propagator;
use crate::simulation::trajectory::check_time_grid;
use crate::simulation::{SimulationError, Trajectory};

/// Builds trajectories by repeated propagation, going through the result
/// cache first.
#[derive(Clone)]
pub struct Simulator {
    cache: Arc<ResultCache>,
}

impl Simulator {
    pub fn new(cache: Arc<ResultCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Returns `step_count + 1` states starting at `initial`, sampled every
    /// `dt` seconds from `epoch`.
    pub fn propagate_series(
        &self,
        initial: &State,
        epoch: DateTime<Utc>,
        propagator: &dyn Propagator,
        step_count: usize,
        dt: f64,
    ) -> Result<Trajectory, SimulationError> {
        check_time_grid(&epoch, dt, step_count)?;
        let key = Trajectory::fingerprint_for(propagator.label(), &epoch, step_count, dt, initial);
        let fits = |t: &Trajectory| {
            t.len() == step_count + 1
                && t.first() == initial
                && t.epoch() == epoch
                && t.step_seconds().to_bits() == dt.to_bits()
                && t.label() == propagator.label()
        };

        self.cache.get_or_compute_if(&key, fits, || {
            debug!(
                "Propagating {} steps of {} s with {}",
                step_count,
                dt,
                propagator.label()
            );
            let mut states = Vec::with_capacity(step_count + 1);
            states.push(*initial);
            let mut current = *initial;
            for step in 1..=step_count {
                current = propagator
                    .step(&current, dt)
                    .map_err(|source| SimulationError::Step { step, source })?;
                states.push(current);
            }
            Trajectory::new(propagator.label(), epoch, dt, states)
        })
    }
}
