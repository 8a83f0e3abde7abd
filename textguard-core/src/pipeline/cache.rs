//! cache.rs - Built pipelines, keyed by configuration fingerprint.
//!
//! Presets rarely change, so the same merged configuration is built over
//! and over. The cache maps a SHA-256 fingerprint of that configuration to
//! a shared [`Pipeline`]. Keys are computed over a canonical form with
//! object keys sorted, so two maps that differ only in key order share one
//! entry (their pipelines are identical, since the registry fixes order).
//!
//! Overrides can come from request data, so the cache holds at most
//! `capacity` pipelines and evicts the oldest insertion when full.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::errors::TextGuardError;
use crate::step::StepOptions;

use super::Pipeline;

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Hex SHA-256 of the canonical JSON form of `specs`.
pub fn fingerprint(specs: &StepOptions) -> String {
    let canonical = canonicalize(&Value::Object(specs.clone()));
    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Pipelines kept by a [`PipelineCache`] unless told otherwise.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct Entries {
    pipelines: HashMap<String, Arc<Pipeline>>,
    // Insertion order, oldest first.
    order: VecDeque<String>,
}

/// A thread-safe, bounded map from configuration fingerprint to built
/// pipeline.
#[derive(Debug)]
pub struct PipelineCache {
    entries: RwLock<Entries>,
    capacity: usize,
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` pipelines (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: RwLock::new(Entries::default()), capacity: capacity.max(1) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached pipeline for `specs`, building it with `build` on
    /// a miss. Build errors are returned and nothing is cached.
    pub fn get_or_build<F>(&self, specs: &StepOptions, build: F) -> Result<Arc<Pipeline>, TextGuardError>
    where
        F: FnOnce(&StepOptions) -> Result<Pipeline, TextGuardError>,
    {
        let key = fingerprint(specs);

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(pipeline) = entries.pipelines.get(&key) {
                debug!("Serving pipeline from cache for key: {}", &key[..12]);
                return Ok(Arc::clone(pipeline));
            }
        }

        debug!("Pipeline not found in cache. Building now.");
        let pipeline = Arc::new(build(specs)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have built the same pipeline meanwhile.
        if let Some(existing) = entries.pipelines.get(&key) {
            return Ok(Arc::clone(existing));
        }
        while entries.pipelines.len() >= self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            debug!("Evicting cached pipeline for key: {}", &oldest[..12]);
            entries.pipelines.remove(&oldest);
        }
        entries.order.push_back(key.clone());
        entries.pipelines.insert(key, Arc::clone(&pipeline));
        Ok(pipeline)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !entries.pipelines.is_empty() {
            debug!("Clearing {} cached pipeline(s).", entries.pipelines.len());
        }
        entries.pipelines.clear();
        entries.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::build_pipeline;
    use crate::registry::StepRegistry;
    use serde_json::json;

    fn specs(value: Value) -> StepOptions {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let a = specs(json!({"trim_whitespace": true, "truncate_length": {"max": 5, "x": [1, 2]}}));
        let b = specs(json!({"truncate_length": {"x": [1, 2], "max": 5}, "trim_whitespace": true}));
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 64);

        let c = specs(json!({"truncate_length": {"x": [2, 1], "max": 5}, "trim_whitespace": true}));
        assert_ne!(fingerprint(&a), fingerprint(&c));
    }

    #[test]
    fn test_get_or_build_reuses_pipelines() {
        let registry = StepRegistry::with_builtin_steps();
        let cache = PipelineCache::new();
        let config = specs(json!({"trim_whitespace": true}));

        let first = cache.get_or_build(&config, |s| build_pipeline(&registry, s)).unwrap();
        let second = cache
            .get_or_build(&config, |_| panic!("should have been served from cache"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_build_errors_are_not_cached() {
        let registry = StepRegistry::with_builtin_steps();
        let cache = PipelineCache::new();
        let config = specs(json!({"truncate_length": "lots"}));
        assert!(cache.get_or_build(&config, |s| build_pipeline(&registry, s)).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_is_bounded() {
        let registry = StepRegistry::with_builtin_steps();
        let cache = PipelineCache::new();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);

        for max in 1..5000 {
            let config = specs(json!({"truncate_length": max}));
            cache.get_or_build(&config, |s| build_pipeline(&registry, s)).unwrap();
            assert!(cache.len() <= DEFAULT_CACHE_CAPACITY);
        }
        assert_eq!(cache.len(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_oldest_pipeline_is_evicted_first() {
        let registry = StepRegistry::with_builtin_steps();
        let cache = PipelineCache::with_capacity(2);
        let config = |max: u64| specs(json!({"truncate_length": max}));
        let build = |s: &StepOptions| build_pipeline(&registry, s);

        let first = cache.get_or_build(&config(1), build).unwrap();
        cache.get_or_build(&config(2), build).unwrap();
        // A hit does not refresh the entry's position.
        let again = cache.get_or_build(&config(1), |_| panic!("should have been served from cache")).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        cache.get_or_build(&config(3), build).unwrap();
        assert_eq!(cache.len(), 2);
        cache.get_or_build(&config(2), |_| panic!("should have been served from cache")).unwrap();
        let rebuilt = cache.get_or_build(&config(1), build).unwrap();
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(cache.len(), 2);

        assert_eq!(PipelineCache::with_capacity(0).capacity(), 1);
    }
}
