//! Orbit propagation, frame conversions and ground-station site selection.

pub mod cache;
pub mod compare;
pub mod config;
pub mod earth;
pub mod frames;
pub mod propagate;
pub mod search;
pub mod simulation;
pub mod station;
