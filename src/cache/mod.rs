//! In-memory TTL cache for odds boards.
//!
//! Vendor quotas are tight (API-Football free tier: 100 req/day), so the
//! server keeps recent boards keyed by request parameters. The cache is
//! owned by whoever constructs it and has an explicit capacity and TTL.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Bounded map whose entries expire after a fixed TTL.
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl: Duration,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Fresh value for `key`, or `None` if absent or expired.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<V> {
        let ttl = self.ttl;
        match self.entries.get(key) {
            Some(entry) if now - entry.inserted_at < ttl => {
                self.hits += 1;
                Some(entry.value.clone())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: String, value: V) {
        self.insert_at(key, value, Utc::now());
    }

    fn insert_at(&mut self, key: String, value: V, now: DateTime<Utc>) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_expired_at(now);
            if self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        self.entries.insert(key, CacheEntry { value, inserted_at: now });
    }

    /// Remove expired entries.
    pub fn evict_expired(&mut self) {
        self.evict_expired_at(Utc::now());
    }

    fn evict_expired_at(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.inserted_at < ttl);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "Evicted expired cache entries");
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            debug!(key = %key, "Evicted oldest cache entry");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// (hits, misses) since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
