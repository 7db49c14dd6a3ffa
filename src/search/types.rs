use serde::{Deserialize, Serialize};

use crate::station::GroundStation;

/// A lattice site and the trajectory samples it can see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub station: GroundStation,
    /// Ascending sample indices.
    pub visible: Vec<usize>,
}

impl Candidate {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

/// A candidate dropped because its land lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupFailure {
    pub station: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub reason: String,
}

/// Land candidates split by hemisphere, in lattice order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hemispheres {
    pub north: Vec<Candidate>,
    pub south: Vec<Candidate>,
    pub lookup_failures: Vec<LookupFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteScore {
    pub station: GroundStation,
    pub visible_count: usize,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Northern candidates first, then southern.
    pub sites: Vec<SiteScore>,
    pub lookup_failures: Vec<LookupFailure>,
}

impl SearchResult {
    pub fn selected(&self) -> impl Iterator<Item = &SiteScore> {
        self.sites.iter().filter(|s| s.selected)
    }
}
