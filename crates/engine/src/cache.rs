//! Read-through memo for the expense listing.
//!
//! Entries expire after their TTL and are all dropped by [`QueryCache::flush_all`].
//! Expiry is checked lazily on read; expired entries are swept on the next
//! write.
//!
//! Every flush bumps a generation counter. A reader captures the generation
//! before querying the store and fills the cache with
//! [`QueryCache::set_if_fresh`], which refuses the fill if a flush happened
//! in between.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

use crate::Expense;

/// Filter parameters of one expense listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExpenseQuery {
    /// `None` means all categories.
    pub category: Option<String>,
    pub month: u32,
    pub year: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    ExpenseList(ExpenseQuery),
    ExpenseTotal(ExpenseQuery),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CachedValue {
    Expenses(Vec<Expense>),
    Total(i64),
}

#[derive(Debug)]
struct Entry {
    value: CachedValue,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct Inner {
    generation: u64,
    entries: HashMap<CacheKey, Entry>,
}

impl Inner {
    fn insert(&mut self, key: CacheKey, value: CachedValue, ttl: Duration, now: Instant) {
        self.entries.retain(|_, entry| entry.is_live(now));
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }
}

/// Shared, internally synchronized TTL cache.
///
/// Built once per process and handed to the façade by reference.
#[derive(Debug, Default)]
pub struct QueryCache {
    inner: RwLock<Inner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key` if it has not expired and no
    /// flush happened since it was stored.
    pub async fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, overwriting any previous entry.
    pub async fn set(&self, key: CacheKey, value: CachedValue, ttl: Duration) {
        let mut inner = self.inner.write().await;
        inner.insert(key, value, ttl, Instant::now());
    }

    /// Stores all `values` atomically, but only if no flush happened since
    /// `generation` was read. Returns whether the values were stored.
    pub async fn set_if_fresh(
        &self,
        generation: u64,
        values: Vec<(CacheKey, CachedValue)>,
        ttl: Duration,
    ) -> bool {
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            return false;
        }
        let now = Instant::now();
        for (key, value) in values {
            inner.insert(key, value, ttl, now);
        }
        true
    }

    /// Current flush generation.
    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Drops every entry.
    pub async fn flush_all(&self) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.generation = inner.generation.wrapping_add(1);
        tracing::debug!(generation = inner.generation, "query cache flushed");
    }

    /// Number of entries that would currently be served.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let inner = self.inner.read().await;
        inner
            .entries
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
