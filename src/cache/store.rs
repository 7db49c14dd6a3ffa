use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::cache::{CacheError, Fingerprint};

/// File-backed store of computed results, one JSON blob per fingerprint.
///
/// Entries are written once and never modified; deleting the file is the
/// only way to invalidate one. A missing or unreadable entry is a miss.
pub struct ResultCache {
    dir: Option<PathBuf>,
    in_flight: Mutex<HashMap<Fingerprint, Arc<Mutex<()>>>>,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// A cache that never hits and never writes.
    pub fn disabled() -> Self {
        Self {
            dir: None,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn entry_path(&self, key: &Fingerprint) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", key)))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &Fingerprint) -> Option<T> {
        let path = self.entry_path(key)?;
        if !path.is_file() {
            return None;
        }

        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding corrupt cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Publishes `value` under `key`. The blob is written to a temporary file
    /// and renamed into place, so readers never observe a partial entry.
    pub fn store<T: Serialize>(&self, key: &Fingerprint, value: &T) -> Result<(), CacheError> {
        let (Some(dir), Some(path)) = (self.dir.as_ref(), self.entry_path(key)) else {
            return Ok(());
        };
        fs::create_dir_all(dir)?;

        let blob = serde_json::to_vec(value)?;
        let staging = dir.join(format!(".{}.{}.tmp", key, std::process::id()));
        fs::write(&staging, blob)?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        debug!("Wrote cache entry {}", path.display());
        Ok(())
    }

    /// Deletes the entry for `key`. Returns whether one existed.
    pub fn invalidate(&self, key: &Fingerprint) -> Result<bool, CacheError> {
        let Some(path) = self.entry_path(key) else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    /// Returns the cached value for `key`, or runs `compute` and caches its
    /// result. Concurrent callers with the same key are serialised so the
    /// computation runs at most once at a time per key.
    pub fn get_or_compute<T, E, F>(&self, key: &Fingerprint, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        self.get_or_compute_if(key, |_| true, compute)
    }

    /// Like [`get_or_compute`](Self::get_or_compute), restricted to values
    /// `keep` accepts: a stored entry it rejects is recomputed, and a computed
    /// value it rejects is returned without being stored.
    pub fn get_or_compute_if<T, E, F, K>(
        &self,
        key: &Fingerprint,
        keep: K,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
        K: Fn(&T) -> bool,
    {
        let lock = self.key_lock(key);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.load_or_compute(key, keep, compute)
        };
        self.release(key, &lock);
        result
    }

    fn load_or_compute<T, E, F, K>(&self, key: &Fingerprint, keep: K, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
        K: Fn(&T) -> bool,
    {
        match self.load(key) {
            Some(hit) if keep(&hit) => {
                info!("Cache hit for {}", key);
                return Ok(hit);
            }
            Some(_) => warn!("Discarding cache entry {} that does not fit the request", key),
            None => debug!("Cache miss for {}", key),
        }

        let value = compute()?;
        if !keep(&value) {
            debug!("Not caching partial result for {}", key);
        } else if let Err(e) = self.store(key, &value) {
            warn!("Failed to write cache entry {}: {}", key, e);
        }
        Ok(value)
    }

    fn key_lock(&self, key: &Fingerprint) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.entry(key.clone()).or_default().clone()
    }

    /// Drops the per-key lock once no other caller holds or waits on it.
    fn release(&self, key: &Fingerprint, lock: &Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // one reference in the map, one held by the caller
        if Arc::strong_count(lock) <= 2 {
            in_flight.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FingerprintBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn key(name: &str) -> Fingerprint {
        FingerprintBuilder::new("test").text(name).build()
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        assert_eq!(cache.load::<Vec<f64>>(&key("absent")), None);
    }

    #[test]
    fn stored_value_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path().join("nested"));
        let value = vec![0.1, 1.0 / 3.0, -2.5e-17];
        cache.store(&key("v"), &value).unwrap();
        assert_eq!(cache.load::<Vec<f64>>(&key("v")), Some(value));
    }

    #[test]
    fn corrupt_entry_is_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        let k = key("corrupt");
        fs::write(dir.path().join(format!("{}.json", k)), b"{not json").unwrap();

        let value: Result<u32, CacheError> = cache.get_or_compute(&k, || Ok(7));
        assert_eq!(value.unwrap(), 7);
        assert_eq!(cache.load::<u32>(&k), Some(7));
    }

    #[test]
    fn rejected_entry_is_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        let k = key("stale");
        cache.store(&k, &vec![1.0, 2.0]).unwrap();

        let value: Result<Vec<f64>, CacheError> =
            cache.get_or_compute_if(&k, |v: &Vec<f64>| v.len() == 3, || Ok(vec![1.0, 2.0, 3.0]));
        assert_eq!(value.unwrap().len(), 3);
        assert_eq!(cache.load::<Vec<f64>>(&k).map(|v| v.len()), Some(3));
    }

    #[test]
    fn rejected_result_is_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        let k = key("partial");
        let calls = AtomicUsize::new(0);
        let compute = || -> Result<Vec<u32>, CacheError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1])
        };

        for _ in 0..2 {
            let value = cache.get_or_compute_if(&k, |v: &Vec<u32>| v.len() > 1, compute);
            assert_eq!(value.unwrap(), vec![1]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.load::<Vec<u32>>(&k), None);
    }

    #[test]
    fn key_locks_are_released_after_use() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        for i in 0..16 {
            let value: Result<usize, CacheError> =
                cache.get_or_compute(&key(&i.to_string()), || Ok(i));
            assert_eq!(value.unwrap(), i);
        }
        let failed: Result<usize, &str> = cache.get_or_compute(&key("failed"), || Err("boom"));
        assert!(failed.is_err());
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }

    #[test]
    fn second_request_does_not_recompute() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        let calls = AtomicUsize::new(0);
        let compute = || -> Result<String, CacheError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("done".into())
        };

        assert_eq!(cache.get_or_compute(&key("once"), compute).unwrap(), "done");
        assert_eq!(cache.get_or_compute(&key("once"), compute).unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_requests_compute_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        let calls = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let result: Result<u64, CacheError> = cache.get_or_compute(&key("shared"), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(20));
                        Ok(42)
                    });
                    assert_eq!(result.unwrap(), 42);
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }

    #[test]
    fn invalidate_forces_recompute() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        cache.store(&key("gone"), &1u8).unwrap();
        assert!(cache.invalidate(&key("gone")).unwrap());
        assert!(!cache.invalidate(&key("gone")).unwrap());
        assert_eq!(cache.load::<u8>(&key("gone")), None);
    }

    #[test]
    fn disabled_cache_always_computes() {
        let cache = ResultCache::disabled();
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            let _: Result<u8, CacheError> = cache.get_or_compute(&key("x"), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
