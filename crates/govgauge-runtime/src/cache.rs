//! Fingerprinting and result caching.
//!
//! A fingerprint is a deterministic content hash of (assessment id,
//! canonical answer encoding, configuration version). Identical inputs
//! always map to the same fingerprint, so each unique input combination
//! is computed at most once while cached. Entries are only ever replaced
//! whole, never updated in place.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use govgauge_core::{AnswerSet, Assessment, RecommendationResult};
use moka::future::Cache;

/// Compute the cache key for an assessment under a configuration
/// version. Any change to answers or configuration yields a new key,
/// which is how stale entries are implicitly invalidated.
pub fn fingerprint(assessment: &Assessment, config_version: &str) -> String {
    format!(
        "{:016x}{:016x}{:016x}",
        hash_str(&assessment.id),
        hash_answers(&assessment.answers),
        hash_str(config_version)
    )
}

fn hash_str(value: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn hash_answers(answers: &AnswerSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    // BTreeMap iteration is ordered, so the JSON encoding is canonical.
    if let Ok(encoded) = serde_json::to_string(answers) {
        encoded.hash(&mut hasher);
    }
    hasher.finish()
}

/// Recommendation result cache keyed by fingerprint.
pub struct RecommendationCache {
    cache: Cache<String, RecommendationResult>,
}

impl RecommendationCache {
    /// Create a cache bounded to `max_entries` with the given
    /// time-to-live.
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, fingerprint: &str) -> Option<RecommendationResult> {
        self.cache.get(fingerprint).await
    }

    pub async fn insert(&self, fingerprint: String, result: RecommendationResult) {
        self.cache.insert(fingerprint, result).await;
    }

    /// Drop every entry. Used for explicit clears and for the coarse
    /// invalidation on scoring-weight changes.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(3600))
    }
}
