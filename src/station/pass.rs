use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Look angles of a target at one edge of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassEdge {
    /// Sample index in the trajectory.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub elevation: f64,
    pub azimuth: f64,
}

/// One contiguous visibility window. `start` is the first visible sample,
/// `end` the first sample after it that is no longer visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    pub start: PassEdge,
    pub end: PassEdge,
}

impl Pass {
    pub fn duration(&self) -> chrono::Duration {
        self.end.timestamp - self.start.timestamp
    }
}
