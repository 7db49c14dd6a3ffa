use std::thread;
use std::time::{Duration, Instant};

use crate::search::LookupError;

/// Decides whether a coordinate lies on a landmass, usually by asking a
/// reverse geocoder.
pub trait LandLookup {
    /// Identifies the data source in cache keys.
    fn source(&self) -> &str;

    fn is_land(&mut self, latitude_deg: f64, longitude_deg: f64) -> Result<bool, LookupError>;

    /// Whether calls reach a service that needs spacing out.
    fn rate_limited(&self) -> bool {
        true
    }
}

/// Treats every coordinate as land.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllLand;

impl LandLookup for AllLand {
    fn source(&self) -> &str {
        "all_land"
    }

    fn is_land(&mut self, _latitude_deg: f64, _longitude_deg: f64) -> Result<bool, LookupError> {
        Ok(true)
    }

    fn rate_limited(&self) -> bool {
        false
    }
}

/// Spaces calls to `inner` at least `interval` apart, unless `inner` answers
/// locally.
pub struct Throttled<L> {
    inner: L,
    interval: Duration,
    last: Option<Instant>,
}

impl<L: LandLookup> Throttled<L> {
    pub fn new(inner: L, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last: None,
        }
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: LandLookup> LandLookup for Throttled<L> {
    fn source(&self) -> &str {
        self.inner.source()
    }

    fn is_land(&mut self, latitude_deg: f64, longitude_deg: f64) -> Result<bool, LookupError> {
        if let Some(last) = self.last.filter(|_| self.inner.rate_limited()) {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        let result = self.inner.is_land(latitude_deg, longitude_deg);
        self.last = Some(Instant::now());
        result
    }

    fn rate_limited(&self) -> bool {
        self.inner.rate_limited()
    }
}
