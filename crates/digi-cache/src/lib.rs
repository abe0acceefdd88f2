//! Transient cache for DigiBlog.
//!
//! Provides [`TransientCache`], a bounded in-memory cache keyed by opaque
//! strings. Entries carry their own time-to-live and are evicted in
//! least-recently-used order once the capacity is exceeded.
//!
//! The cache is an explicit value: the composition root constructs it and
//! hands out `Arc` handles to whatever needs it. There is no global instance.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use std::time::Duration;
//! use digi_cache::TransientCache;
//!
//! let cache = TransientCache::new(NonZeroUsize::new(300).unwrap());
//! let value = cache.get_or_compute("doc", Duration::from_secs(60), || 42);
//! assert_eq!(value, 42);
//!
//! // Second call within the TTL is served from the cache.
//! let value = cache.get_or_compute("doc", Duration::from_secs(60), || unreachable!());
//! assert_eq!(value, 42);
//! ```

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

/// A cached value together with its expiry deadline.
struct Entry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Bounded LRU cache with per-entry TTL.
///
/// All operations are atomic per key. Lookups and stores never fail: a
/// poisoned lock or an expired entry is reported as a miss.
///
/// [`get_or_compute`](Self::get_or_compute) does not hold the lock while the
/// compute closure runs, so concurrent misses for the same key may each
/// invoke it. Callers must pass idempotent closures.
pub struct TransientCache<V> {
    /// `None` when caching is disabled.
    entries: Option<Mutex<LruCache<String, Entry<V>>>>,
}

impl<V: Clone> TransientCache<V> {
    /// Create a cache holding at most `max_entries` values.
    #[must_use]
    pub fn new(max_entries: NonZeroUsize) -> Self {
        Self {
            entries: Some(Mutex::new(LruCache::new(max_entries))),
        }
    }

    /// Create a cache that never stores anything.
    ///
    /// Every lookup misses and every `get_or_compute` call runs its closure.
    #[must_use]
    pub fn disabled() -> Self {
        Self { entries: None }
    }

    /// Create a cache from configuration values.
    ///
    /// A disabled flag or a zero capacity both yield [`TransientCache::disabled`].
    #[must_use]
    pub fn from_settings(enabled: bool, max_entries: usize) -> Self {
        match NonZeroUsize::new(max_entries) {
            Some(capacity) if enabled => Self::new(capacity),
            _ => Self::disabled(),
        }
    }

    /// Whether this cache stores values at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Look up a fresh value.
    ///
    /// Expired entries are removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.as_ref()?.lock().ok()?;
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        entries.pop(key);
        tracing::debug!(key, "cache entry expired");
        None
    }

    /// Store a value with the given time-to-live.
    ///
    /// Overwrites any existing entry for `key`. Silently does nothing when
    /// the cache is disabled.
    pub fn insert(&self, key: &str, value: V, ttl: Duration) {
        let Some(entries) = &self.entries else {
            return;
        };
        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        let Ok(mut entries) = entries.lock() else {
            return;
        };

        if let Some((evicted, _)) = entries.push(key.to_owned(), entry)
            && evicted != key
        {
            tracing::debug!(key = %evicted, "cache entry evicted");
        }
    }

    /// Return the cached value for `key` or compute and store it.
    ///
    /// On a hit within the entry's TTL the closure is not invoked. On a miss
    /// or expiry it is invoked exactly once and its result is stored with
    /// `ttl`.
    pub fn get_or_compute<F>(&self, key: &str, ttl: Duration, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return value;
        }

        let value = compute();
        self.insert(key, value.clone(), ttl);
        value
    }

    /// Remove an entry.
    pub fn invalidate(&self, key: &str) {
        if let Some(entries) = &self.entries
            && let Ok(mut entries) = entries.lock()
        {
            entries.pop(key);
        }
    }

    /// Number of stored entries, including ones that have expired but were
    /// not yet looked up.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .as_ref()
            .and_then(|entries| entries.lock().ok().map(|e| e.len()))
            .unwrap_or(0)
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
