use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cache::ResultCache;
use crate::earth::{EarthModel, J2Model};
use crate::search::{LandLookup, Throttled};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub earth: EarthModel,
    pub j2: J2Model,
    pub cache: CacheConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            enabled: true,
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/cache")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    /// Lattice spacing in degrees.
    #[serde(default = "default_increment_deg")]
    pub increment_deg: f64,
    /// Minimum delay between land lookups, e.g. `"1s"` or `"1500ms"`.
    #[serde(
        default = "default_lookup_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub lookup_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            increment_deg: default_increment_deg(),
            lookup_interval: default_lookup_interval(),
        }
    }
}

fn default_increment_deg() -> f64 {
    9.0
}

fn default_lookup_interval() -> Duration {
    Duration::from_secs(1)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn open_cache(&self) -> ResultCache {
        if self.cache.enabled {
            ResultCache::new(&self.cache.dir)
        } else {
            ResultCache::disabled()
        }
    }

    /// Wraps `inner` so its calls respect `search.lookup_interval`.
    pub fn land_lookup<L: LandLookup>(&self, inner: L) -> Throttled<L> {
        Throttled::new(inner, self.search.lookup_interval)
    }
}
