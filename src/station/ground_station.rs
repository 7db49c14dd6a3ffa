use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::earth::EarthModel;
use crate::frames::{ecef_to_geodetic, geodetic_to_ecef, project_onto_basis, topocentric_basis, Enu};
use crate::simulation::EcefTrack;
use crate::station::{Pass, PassEdge};

/// Minimum elevation (≈5°) a target must exceed to count as visible.
pub const VISIBILITY_THRESHOLD_RAD: f64 = 0.087_266_5;

pub fn is_visible_elevation(elevation: f64) -> bool {
    elevation > VISIBILITY_THRESHOLD_RAD
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StationRecord {
    name: String,
    ecef: Vector3<f64>,
}

/// Observer fixed on the Earth's surface. Latitude, longitude and the local
/// ENU basis are derived from the ECEF position once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StationRecord", into = "StationRecord")]
pub struct GroundStation {
    name: String,
    ecef: Vector3<f64>,
    latitude: f64,
    longitude: f64,
    enu: Enu,
}

impl From<StationRecord> for GroundStation {
    fn from(record: StationRecord) -> Self {
        GroundStation::new(record.name, record.ecef)
    }
}

impl From<GroundStation> for StationRecord {
    fn from(station: GroundStation) -> Self {
        StationRecord {
            name: station.name,
            ecef: station.ecef,
        }
    }
}

impl GroundStation {
    pub fn new(name: impl Into<String>, ecef: Vector3<f64>) -> Self {
        // latitude and longitude do not depend on the radius model
        let geo = ecef_to_geodetic(&ecef, &EarthModel::default());
        Self {
            name: name.into(),
            ecef,
            latitude: geo.latitude,
            longitude: geo.longitude,
            enu: topocentric_basis(geo.latitude, geo.longitude),
        }
    }

    /// Station on the surface at the given latitude and longitude (radians).
    pub fn from_geodetic(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        earth: &EarthModel,
    ) -> Self {
        Self::new(name, geodetic_to_ecef(latitude, longitude, earth))
    }

    /// Parses `"lat,lon"` in degrees.
    pub fn from_coordinates(
        name: impl Into<String>,
        coordinates: &str,
        earth: &EarthModel,
    ) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !lon.is_finite() {
            return None;
        }
        Some(Self::from_geodetic(name, lat.to_radians(), lon.to_radians(), earth))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ecef(&self) -> &Vector3<f64> {
        &self.ecef
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn enu(&self) -> &Enu {
        &self.enu
    }

    /// Elevation and azimuth (radians) of an ECEF target. Azimuth is measured
    /// from north towards east, in (-π, π].
    pub fn elevation_azimuth(&self, target: &Vector3<f64>) -> (f64, f64) {
        let line_of_sight = target - self.ecef;
        let range = line_of_sight.norm();
        if range == 0.0 {
            return (0.0, 0.0);
        }
        let local = project_onto_basis(&(line_of_sight / range), &self.enu);
        (local.z.clamp(-1.0, 1.0).asin(), local.x.atan2(local.y))
    }

    pub fn visible(&self, target: &Vector3<f64>) -> bool {
        is_visible_elevation(self.elevation_azimuth(target).0)
    }

    /// Indices of the track samples this station can see.
    pub fn visible_indices(&self, track: &EcefTrack) -> Vec<usize> {
        track
            .positions()
            .iter()
            .enumerate()
            .filter(|(_, p)| self.visible(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// `(first visible, first not visible again)` index pairs. A window still
    /// open at the last sample has no closing edge and is left out.
    fn windows(&self, track: &EcefTrack) -> Vec<(usize, usize)> {
        let mut windows = Vec::new();
        let mut open: Option<usize> = None;

        for (index, point) in track.positions().iter().enumerate() {
            match (open, self.visible(point)) {
                (None, true) => open = Some(index),
                (Some(start), false) => {
                    windows.push((start, index));
                    open = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open {
            debug!(
                "Dropping pass over {} opened at sample {} and still open at end of track",
                self.name, start
            );
        }
        windows
    }

    fn edge(&self, track: &EcefTrack, index: usize) -> PassEdge {
        let (elevation, azimuth) = self.elevation_azimuth(&track.positions()[index]);
        PassEdge {
            index,
            timestamp: track.timestamp(index),
            elevation,
            azimuth,
        }
    }

    pub fn pass_intervals(&self, track: &EcefTrack) -> Vec<Pass> {
        self.windows(track)
            .into_iter()
            .map(|(start, end)| Pass {
                start: self.edge(track, start),
                end: self.edge(track, end),
            })
            .collect()
    }

    /// Visible positions grouped by pass.
    pub fn divide_passes(&self, track: &EcefTrack) -> Vec<Vec<Vector3<f64>>> {
        self.windows(track)
            .into_iter()
            .map(|(start, end)| track.positions()[start..end].to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone, Utc};
    use std::f64::consts::FRAC_PI_2;

    fn equator_station() -> GroundStation {
        GroundStation::from_geodetic("origin", 0.0, 0.0, &EarthModel::default())
    }

    fn track(pattern: &[bool]) -> EcefTrack {
        let overhead = Vector3::new(20_000.0, 0.0, 0.0);
        let below = Vector3::new(-20_000.0, 0.0, 0.0);
        let positions = pattern
            .iter()
            .map(|&v| if v { overhead } else { below })
            .collect();
        EcefTrack::new(Utc.with_ymd_and_hms(2016, 3, 1, 0, 0, 0).unwrap(), 10.0, positions)
    }

    #[test]
    fn basis_is_derived_from_position() {
        let station = GroundStation::from_coordinates("graz", "47.07, 15.49", &EarthModel::default())
            .unwrap();
        assert_abs_diff_eq!(station.latitude().to_degrees(), 47.07, epsilon = 1e-9);
        assert_abs_diff_eq!(station.longitude().to_degrees(), 15.49, epsilon = 1e-9);
        assert_abs_diff_eq!(station.enu().up, station.ecef().normalize(), epsilon = 1e-12);
    }

    #[test]
    fn bad_coordinates_are_rejected() {
        let earth = EarthModel::default();
        assert!(GroundStation::from_coordinates("x", "47.0", &earth).is_none());
        assert!(GroundStation::from_coordinates("x", "north,east", &earth).is_none());
        assert!(GroundStation::from_coordinates("x", "91,0", &earth).is_none());
    }

    #[test]
    fn look_angles_follow_compass_convention() {
        let station = equator_station();
        let base = *station.ecef();

        let (el, az) = station.elevation_azimuth(&(base + Vector3::new(1_000.0, 0.0, 1_000.0)));
        assert_abs_diff_eq!(el, FRAC_PI_2 / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(az, 0.0, epsilon = 1e-12);

        let (el, az) = station.elevation_azimuth(&(base + Vector3::new(0.0, 1_000.0, 0.0)));
        assert_abs_diff_eq!(el, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(az, FRAC_PI_2, epsilon = 1e-12);

        let (el, _) = station.elevation_azimuth(&(base * 3.0));
        assert_abs_diff_eq!(el, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!is_visible_elevation(VISIBILITY_THRESHOLD_RAD));
        assert!(is_visible_elevation(VISIBILITY_THRESHOLD_RAD + 1e-12));
        assert!(!is_visible_elevation(0.0));
    }

    #[test]
    fn just_above_and_below_the_horizon_mask() {
        let station = equator_station();
        let base = *station.ecef();
        let above = VISIBILITY_THRESHOLD_RAD + 1e-6;
        let below = VISIBILITY_THRESHOLD_RAD - 1e-6;
        let towards = |el: f64| base + 1_000.0 * Vector3::new(el.sin(), 0.0, el.cos());
        assert!(station.visible(&towards(above)));
        assert!(!station.visible(&towards(below)));
    }

    #[test]
    fn passes_open_and_close_on_transitions() {
        let station = equator_station();
        let track = track(&[false, true, true, false, true, false]);
        let passes = station.pass_intervals(&track);

        assert_eq!(passes.len(), 2);
        assert_eq!((passes[0].start.index, passes[0].end.index), (1, 3));
        assert_eq!((passes[1].start.index, passes[1].end.index), (4, 5));
        assert_eq!(passes[0].start.timestamp, track.timestamp(1));
        assert_eq!(passes[0].duration(), Duration::seconds(20));
        assert_abs_diff_eq!(passes[0].start.elevation, FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(passes[0].end.elevation, -FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn pass_still_open_at_end_is_dropped() {
        let station = equator_station();
        let track = track(&[true, false, true, true]);
        let passes = station.pass_intervals(&track);
        assert_eq!(passes.len(), 1);
        assert_eq!((passes[0].start.index, passes[0].end.index), (0, 1));
    }

    #[test]
    fn divided_passes_hold_only_visible_points() {
        let station = equator_station();
        let track = track(&[false, true, true, false, true, false, true]);
        let groups = station.divide_passes(&track);
        assert_eq!(groups.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(station.visible_indices(&track), vec![1, 2, 4, 6]);
    }

    #[test]
    fn serialises_as_name_and_position() {
        let station = equator_station();
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["name"], "origin");
        assert!(json.get("enu").is_none());
        let back: GroundStation = serde_json::from_value(json).unwrap();
        assert_eq!(back, station);
    }
}
