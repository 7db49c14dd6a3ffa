mod error;
mod grid;
mod land;
mod select;
mod types;

pub use error::{LookupError, SearchError};
pub use grid::{evaluate_candidates, lattice, split_hemispheres, GridSearch};
pub use land::{AllLand, LandLookup, Throttled};
pub use select::{first_max, select_sites};
pub use types::{Candidate, Hemispheres, LookupFailure, SearchResult, SiteScore};
