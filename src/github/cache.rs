//! TTL caching for GitHub API responses.
//!
//! In-memory caching with time-to-live for frequently accessed,
//! slowly-changing GitHub data. Each endpoint gets its own cache instance,
//! owned by the client that uses it, with TTL tuned to how often the
//! underlying data changes:
//!
//! - Trees: 5 minutes (change with commits, but one session usually sees
//!   the same data)
//! - Languages / contributors: 1 hour (rarely change)
//! - Repo details: 10 minutes (stars/forks drift, but slowly)

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Bounded TTL cache over an internally synchronized map.
///
/// Expired entries are dropped lazily on read; capacity overflow evicts the
/// oldest entries on write.
pub struct TtlCache<V> {
    name: &'static str,
    map: DashMap<String, Entry<V>>,
    ttl: Duration,
    max_size: usize,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration, max_size: usize) -> Self {
        Self {
            name,
            map: DashMap::new(),
            ttl,
            max_size,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        // The shard read guard must drop before any write to the same key
        let expired = match self.map.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!(cache = self.name, key, "cache HIT");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.map.remove(key);
            debug!(cache = self.name, key, "cache EXPIRED");
        } else {
            debug!(cache = self.name, key, "cache MISS");
        }
        None
    }

    pub fn insert(&self, key: String, value: V) {
        if self.map.len() >= self.max_size {
            self.evict();
        }
        self.map.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop expired entries; if still at capacity, drop the oldest entry.
    fn evict(&self) {
        self.map
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);

        while self.map.len() >= self.max_size {
            let oldest = self
                .map
                .iter()
                .min_by_key(|entry| entry.value().inserted_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    drop(self.map.remove(&key));
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&self) {
        self.map.clear();
    }
}
