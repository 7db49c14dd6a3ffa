use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use nalgebra::Vector3;
use serde::Deserialize;

use crate::frames::State;
use crate::simulation::LoadError;

/// Day-first form written by the mission tools, e.g. `04/03/2016, 11:12:00.184000`.
const LEGACY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S%.f";

#[derive(Debug, Deserialize)]
struct RawState {
    name: String,
    cart: Vec<Vec<f64>>,
    t: String,
}

/// Named initial state of a spacecraft.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacecraftState {
    pub name: String,
    pub state: State,
    pub epoch: DateTime<Utc>,
}

impl SpacecraftState {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: RawState = serde_json::from_str(json)?;

        let [position, velocity] = raw.cart.as_slice() else {
            return Err(LoadError::Malformed(format!(
                "cart must hold a position and a velocity, got {} rows",
                raw.cart.len()
            )));
        };
        let state = State::new(vector("position", position)?, vector("velocity", velocity)?);

        Ok(Self {
            name: raw.name,
            state,
            epoch: parse_timestamp(&raw.t)?,
        })
    }
}

fn vector(what: &str, row: &[f64]) -> Result<Vector3<f64>, LoadError> {
    let [x, y, z] = *row else {
        return Err(LoadError::Malformed(format!(
            "{} needs 3 components, got {}",
            what,
            row.len()
        )));
    };
    if ![x, y, z].iter().all(|c| c.is_finite()) {
        return Err(LoadError::Malformed(format!("{} has non-finite components", what)));
    }
    Ok(Vector3::new(x, y, z))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, LoadError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|_| LoadError::Timestamp(raw.to_string()))
}
