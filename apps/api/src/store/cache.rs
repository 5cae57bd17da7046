//! Thread-safe map whose entries expire a fixed TTL after insertion.
//!
//! Expired entries are removed lazily on lookup and eagerly by a periodic
//! sweep (`spawn_sweeper`). Time-taking methods have `_at` variants so tests
//! control the clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Lookup;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

pub struct ExpiringCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        self.entries.write().insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn get(&self, key: &K) -> Lookup<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Lookup<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Lookup::NotFound,
                Some(entry) if now < entry.expires_at => return Lookup::Found(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Expired: re-check under the write lock, the entry may have been replaced.
        let mut entries = self.entries.write();
        match entries.get(key) {
            None => Lookup::NotFound,
            Some(entry) if now < entry.expires_at => Lookup::Found(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                Lookup::Expired
            }
        }
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Runs `sweep` every `every` until the returned task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let removed = self.sweep();
                if removed > 0 {
                    info!("Swept {removed} expired results, {} remaining", self.len());
                } else {
                    debug!("Sweep found no expired results");
                }
            }
        })
    }
}
