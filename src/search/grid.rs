use std::convert::Infallible;
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use log::{info, warn};
use rayon::prelude::*;

use crate::cache::{FingerprintBuilder, ResultCache};
use crate::earth::EarthModel;
use crate::search::{
    select_sites, Candidate, Hemispheres, LandLookup, LookupFailure, SearchError, SearchResult,
    SiteScore,
};
use crate::simulation::{EcefTrack, Trajectory};
use crate::station::GroundStation;

/// Values `start + k·step` strictly below `stop`. Values within rounding
/// distance of `stop` are left out.
fn half_open(start: f64, stop: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = ((stop - start) / step - 1e-9).ceil().max(0.0) as usize;
    (0..count).map(move |k| start + k as f64 * step)
}

/// Surface sites every `increment` radians, longitude-major, named by their
/// position in the lattice. The poles and the ±180° meridian are excluded.
pub fn lattice(increment: f64, earth: &EarthModel) -> Vec<GroundStation> {
    half_open(-PI + increment, PI, increment)
        .flat_map(|longitude| {
            half_open(-FRAC_PI_2 + increment, FRAC_PI_2, increment)
                .map(move |latitude| (latitude, longitude))
        })
        .enumerate()
        .map(|(index, (latitude, longitude))| {
            GroundStation::from_geodetic(index.to_string(), latitude, longitude, earth)
        })
        .collect()
}

/// Pairs each station with the track samples it can see. Runs on the rayon
/// pool; output order matches `stations`.
pub fn evaluate_candidates(stations: Vec<GroundStation>, track: &EcefTrack) -> Vec<Candidate> {
    stations
        .into_par_iter()
        .map(|station| Candidate {
            visible: station.visible_indices(track),
            station,
        })
        .collect()
}

/// Keeps land candidates and splits them at the equator (the equator itself
/// goes south). A failed lookup drops the candidate and is recorded.
pub fn split_hemispheres(candidates: Vec<Candidate>, lookup: &mut dyn LandLookup) -> Hemispheres {
    let mut hemispheres = Hemispheres::default();

    for candidate in candidates {
        let latitude_deg = candidate.station.latitude().to_degrees();
        let longitude_deg = candidate.station.longitude().to_degrees();

        match lookup.is_land(latitude_deg, longitude_deg) {
            Ok(true) => {
                if candidate.station.latitude() > 0.0 {
                    hemispheres.north.push(candidate);
                } else {
                    hemispheres.south.push(candidate);
                }
            }
            Ok(false) => {}
            Err(e) => {
                warn!(
                    "Land lookup for site {} at {:.2}, {:.2} failed: {}",
                    candidate.station.name(),
                    latitude_deg,
                    longitude_deg,
                    e
                );
                hemispheres.lookup_failures.push(LookupFailure {
                    station: candidate.station.name().to_string(),
                    latitude_deg,
                    longitude_deg,
                    reason: e.to_string(),
                });
            }
        }
    }

    hemispheres
}

fn score(hemisphere: Vec<Candidate>, label: &str) -> Vec<SiteScore> {
    let picks = select_sites(&hemisphere);
    for (phase, &index) in picks.iter().enumerate() {
        let site = &hemisphere[index];
        info!(
            "{} phase {} pick: site {} at {:.2}, {:.2} sees {} samples",
            label,
            phase + 1,
            site.station.name(),
            site.station.latitude().to_degrees(),
            site.station.longitude().to_degrees(),
            site.visible_count()
        );
    }

    hemisphere
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| SiteScore {
            visible_count: candidate.visible_count(),
            station: candidate.station,
            selected: picks.contains(&index),
        })
        .collect()
}

/// Grid search for ground-station sites over one trajectory. The evaluated
/// lattice and the land-filtered hemispheres are cached; the selection
/// itself is always recomputed.
pub struct GridSearch {
    cache: Arc<ResultCache>,
    earth: EarthModel,
    increment: f64,
}

impl GridSearch {
    pub fn new(cache: Arc<ResultCache>, earth: EarthModel, increment: f64) -> Result<Self, SearchError> {
        if !increment.is_finite() || increment <= 0.0 {
            return Err(SearchError::InvalidIncrement(increment));
        }
        Ok(Self {
            cache,
            earth,
            increment,
        })
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn candidates(&self, trajectory: &Trajectory) -> Vec<Candidate> {
        let key = FingerprintBuilder::new("grid_search")
            .float(self.increment)
            .text(trajectory.fingerprint())
            .build();

        let result = self.cache.get_or_compute(&key, || {
            let stations = lattice(self.increment, &self.earth);
            info!("Evaluating {} candidate sites", stations.len());
            Ok::<_, Infallible>(evaluate_candidates(stations, &trajectory.to_ecef()))
        });
        result.unwrap_or_else(|never| match never {})
    }

    pub fn hemispheres(&self, trajectory: &Trajectory, lookup: &mut dyn LandLookup) -> Hemispheres {
        let key = FingerprintBuilder::new("filtered_grid_search")
            .float(self.increment)
            .text(trajectory.fingerprint())
            .text(lookup.source())
            .build();

        // a split with failed lookups is retried on the next run
        let complete = |h: &Hemispheres| h.lookup_failures.is_empty();
        let result = self.cache.get_or_compute_if(&key, complete, || {
            Ok::<_, Infallible>(split_hemispheres(self.candidates(trajectory), lookup))
        });
        result.unwrap_or_else(|never| match never {})
    }

    /// Up to two sites per hemisphere, flagged among all land candidates.
    pub fn run(&self, trajectory: &Trajectory, lookup: &mut dyn LandLookup) -> SearchResult {
        let Hemispheres {
            north,
            south,
            lookup_failures,
        } = self.hemispheres(trajectory, lookup);

        let mut sites = score(north, "Northern");
        sites.extend(score(south, "Southern"));

        SearchResult {
            sites,
            lookup_failures,
        }
    }
}
