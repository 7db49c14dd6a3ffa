mod ground_station;
mod pass;

pub use ground_station::{is_visible_elevation, GroundStation, VISIBILITY_THRESHOLD_RAD};
pub use pass::{Pass, PassEdge};
