use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::cache::{Fingerprint, FingerprintBuilder};
use crate::earth::EarthModel;
use crate::frames::{ecef_to_geodetic, eci_to_ecef, Geodetic, State};
use crate::simulation::SimulationError;

/// Time of sample `index`, rounded to the microsecond. `None` when the
/// offset leaves the representable date range.
pub(crate) fn sample_time(
    epoch: &DateTime<Utc>,
    step_seconds: f64,
    index: usize,
) -> Option<DateTime<Utc>> {
    let micros = (step_seconds * index as f64 * 1e6).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::microseconds(micros as i64))
}

/// Checks that every sample of a series with `step_count` steps has a
/// timestamp.
pub(crate) fn check_time_grid(
    epoch: &DateTime<Utc>,
    step_seconds: f64,
    step_count: usize,
) -> Result<(), SimulationError> {
    if !step_seconds.is_finite() || sample_time(epoch, step_seconds, step_count).is_none() {
        return Err(SimulationError::InvalidStep(step_seconds));
    }
    Ok(())
}

fn saturating_sample_time(epoch: &DateTime<Utc>, step_seconds: f64, index: usize) -> DateTime<Utc> {
    sample_time(epoch, step_seconds, index).unwrap_or(if step_seconds < 0.0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Inertial states sampled every `step_seconds` from `epoch`, tagged with the
/// propagator that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryRecord")]
pub struct Trajectory {
    label: String,
    epoch: DateTime<Utc>,
    step_seconds: f64,
    states: Vec<State>,
}

/// Serialized form; loading goes back through [`Trajectory::new`].
#[derive(Deserialize)]
struct TrajectoryRecord {
    label: String,
    epoch: DateTime<Utc>,
    step_seconds: f64,
    states: Vec<State>,
}

impl TryFrom<TrajectoryRecord> for Trajectory {
    type Error = SimulationError;

    fn try_from(record: TrajectoryRecord) -> Result<Self, Self::Error> {
        Trajectory::new(record.label, record.epoch, record.step_seconds, record.states)
    }
}

impl Trajectory {
    pub fn new(
        label: impl Into<String>,
        epoch: DateTime<Utc>,
        step_seconds: f64,
        states: Vec<State>,
    ) -> Result<Self, SimulationError> {
        if states.is_empty() {
            return Err(SimulationError::Empty);
        }
        check_time_grid(&epoch, step_seconds, states.len() - 1)?;
        Ok(Self {
            label: label.into(),
            epoch,
            step_seconds,
            states,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn step_seconds(&self) -> f64 {
        self.step_seconds
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn first(&self) -> &State {
        &self.states[0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: a trajectory holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.states.len() - 1
    }

    /// Time of sample `index`. Every index within the series is representable;
    /// times past the end of the date range saturate.
    pub fn timestamp(&self, index: usize) -> DateTime<Utc> {
        saturating_sample_time(&self.epoch, self.step_seconds, index)
    }

    pub fn eci_positions(&self) -> Vec<Vector3<f64>> {
        self.states.iter().map(|s| *s.position()).collect()
    }

    /// Earth-fixed positions, each rotated by the sidereal angle of its own
    /// sample time. Computed on every call; keep the result if it is needed
    /// more than once.
    pub fn to_ecef(&self) -> EcefTrack {
        let positions = self
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| eci_to_ecef(s.position(), &self.timestamp(i)))
            .collect();
        EcefTrack {
            epoch: self.epoch,
            step_seconds: self.step_seconds,
            positions,
        }
    }

    /// Cache key of the series that starts at `initial` and runs for
    /// `step_count` steps.
    pub fn fingerprint_for(
        label: &str,
        epoch: &DateTime<Utc>,
        step_count: usize,
        step_seconds: f64,
        initial: &State,
    ) -> Fingerprint {
        FingerprintBuilder::new("propagate_series")
            .text(label)
            .text(step_count)
            .float(step_seconds)
            .text(epoch.format("%Y%m%dT%H%M%S%6f"))
            .vector(initial.position())
            .vector(initial.velocity())
            .build()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Self::fingerprint_for(
            &self.label,
            &self.epoch,
            self.step_count(),
            self.step_seconds,
            self.first(),
        )
    }
}

/// Earth-fixed positions of a trajectory, on the same time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcefTrack {
    epoch: DateTime<Utc>,
    step_seconds: f64,
    positions: Vec<Vector3<f64>>,
}

impl EcefTrack {
    pub fn new(epoch: DateTime<Utc>, step_seconds: f64, positions: Vec<Vector3<f64>>) -> Self {
        Self {
            epoch,
            step_seconds,
            positions,
        }
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn step_seconds(&self) -> f64 {
        self.step_seconds
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn timestamp(&self, index: usize) -> DateTime<Utc> {
        saturating_sample_time(&self.epoch, self.step_seconds, index)
    }

    /// Ground track.
    pub fn geodetic(&self, earth: &EarthModel) -> Vec<Geodetic> {
        self.positions
            .iter()
            .map(|p| ecef_to_geodetic(p, earth))
            .collect()
    }
}
