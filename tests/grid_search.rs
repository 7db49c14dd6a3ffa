mod common;

use std::sync::Arc;

use orbit_o_mat::cache::ResultCache;
use orbit_o_mat::earth::EarthModel;
use orbit_o_mat::search::{AllLand, GridSearch, LandLookup, LookupError};
use orbit_o_mat::simulation::{Simulator, Trajectory};

use crate::common::{epoch, jason2, CountingPropagator};

fn trajectory(cache: &Arc<ResultCache>) -> Trajectory {
    Simulator::new(cache.clone())
        .propagate_series(&jason2(), epoch(), &CountingPropagator::new(), 600, 10.0)
        .unwrap()
}

#[test]
fn selects_two_sites_per_hemisphere() {
    let cache = Arc::new(ResultCache::disabled());
    let trajectory = trajectory(&cache);
    let search = GridSearch::new(cache, EarthModel::default(), 30f64.to_radians()).unwrap();

    let result = search.run(&trajectory, &mut AllLand);
    let track = trajectory.to_ecef();

    // 11 meridians × 5 parallels; 30° and 60° north, 0°, -30° and -60° south
    assert_eq!(result.sites.len(), 55);
    assert!(result.lookup_failures.is_empty());
    for site in &result.sites {
        assert_eq!(site.visible_count, site.station.visible_indices(&track).len());
    }

    let (north, south): (Vec<_>, Vec<_>) = result
        .sites
        .iter()
        .partition(|s| s.station.latitude() > 0.0);
    assert_eq!(north.len(), 22);
    assert_eq!(south.len(), 33);

    for hemisphere in [&north, &south] {
        let picked: Vec<_> = hemisphere.iter().filter(|s| s.selected).collect();
        assert_eq!(picked.len(), 2);
        let best = hemisphere.iter().map(|s| s.visible_count).max().unwrap();
        assert_eq!(picked.iter().map(|s| s.visible_count).max().unwrap(), best);
    }
    assert_eq!(result.selected().count(), 4);
}

#[test]
fn lattice_and_filtered_hemispheres_are_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(ResultCache::new(dir.path()));
    let trajectory = trajectory(&cache);
    let search = GridSearch::new(cache.clone(), EarthModel::default(), 30f64.to_radians()).unwrap();

    let first = search.run(&trajectory, &mut AllLand);
    let second = search.run(&trajectory, &mut AllLand);
    assert_eq!(first, second);

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().any(|n| n.starts_with("grid_search_")));
    assert!(names.iter().any(|n| n.starts_with("filtered_grid_search_")));
    assert!(names.iter().any(|n| n.starts_with("propagate_series_")));
    assert!(names.iter().all(|n| n.ends_with(".json")));
}

/// Water south of 45°S; lookups west of the prime meridian fail.
struct Flaky {
    calls: usize,
}

impl LandLookup for Flaky {
    fn source(&self) -> &str {
        "flaky"
    }

    fn is_land(&mut self, latitude_deg: f64, longitude_deg: f64) -> Result<bool, LookupError> {
        self.calls += 1;
        if longitude_deg < -1.0 {
            Err(LookupError::Timeout)
        } else {
            Ok(latitude_deg > -45.0)
        }
    }
}

#[test]
fn lookup_failures_drop_candidates_without_aborting() {
    let cache = Arc::new(ResultCache::disabled());
    let trajectory = trajectory(&cache);
    let search = GridSearch::new(cache, EarthModel::default(), 30f64.to_radians()).unwrap();

    let mut lookup = Flaky { calls: 0 };
    let result = search.run(&trajectory, &mut lookup);

    assert_eq!(lookup.calls, 55);
    // five western meridians: -150° .. -30°
    assert_eq!(result.lookup_failures.len(), 5 * 5);
    assert!(result
        .sites
        .iter()
        .all(|s| s.station.longitude() > -1e-9 && s.station.latitude().to_degrees() > -45.0));
    // 0° .. 150° east, four parallels above 45°S
    assert_eq!(result.sites.len(), 6 * 4);
    assert_eq!(result.selected().count(), 4);
}

#[test]
fn split_with_failed_lookups_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(ResultCache::new(dir.path()));
    let trajectory = trajectory(&cache);
    let search = GridSearch::new(cache, EarthModel::default(), 30f64.to_radians()).unwrap();

    let mut lookup = Flaky { calls: 0 };
    let first = search.run(&trajectory, &mut lookup);
    let second = search.run(&trajectory, &mut lookup);
    assert_eq!(first, second);
    assert_eq!(lookup.calls, 2 * 55);

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().any(|n| n.starts_with("grid_search_")));
    assert!(!names.iter().any(|n| n.starts_with("filtered_grid_search_")));
}
