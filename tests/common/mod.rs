#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use nalgebra::Vector3;
use orbit_o_mat::earth::EarthModel;
use orbit_o_mat::frames::State;
use orbit_o_mat::propagate::{KeplerPropagator, PropagateError, Propagator};

/// Low Earth orbit at roughly 1300 km and 66° inclination.
pub fn jason2() -> State {
    State::new(
        Vector3::new(-1_366.1, 3_108.4, 6_802.0),
        Vector3::new(-5.7185, -4.6052, 0.9577),
    )
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 3, 4, 11, 12, 0).unwrap()
}

/// Kepler propagator that counts how often it is stepped.
pub struct CountingPropagator {
    inner: KeplerPropagator,
    pub steps: AtomicUsize,
}

impl CountingPropagator {
    pub fn new() -> Self {
        Self {
            inner: KeplerPropagator::new(EarthModel::default()),
            steps: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }
}

impl Propagator for CountingPropagator {
    fn label(&self) -> &str {
        self.inner.label()
    }

    fn step(&self, state: &State, dt: f64) -> Result<State, PropagateError> {
        self.steps.fetch_add(1, Ordering::SeqCst);
        self.inner.step(state, dt)
    }
}
