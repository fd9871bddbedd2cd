//! Cache store seam
//!
//! The registry never owns cached data. It asks a [`CacheStore`] to drop
//! entries, either by path pattern or wholesale. Two stores ship with the
//! crate: [`ResponseCache`], a concurrent response cache that hosts can use
//! directly, and [`ClearRecorder`], which only records the calls it receives.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;

/// External cache store contract
///
/// Calls are fire-and-forget. An unmatched pattern is a no-op, never an error.
pub trait CacheStore: Send + Sync {
    /// Drop every cached response
    fn clear_all(&self);

    /// Drop cached responses whose request path matches `pattern`
    fn clear_matching(&self, pattern: &str);
}

/// One clear call as seen by a [`ClearRecorder`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "pattern", rename_all = "snake_case")]
pub enum ClearCall {
    All,
    Pattern(String),
}

/// Store that records clear calls in invocation order
#[derive(Debug, Default)]
pub struct ClearRecorder {
    calls: Mutex<Vec<ClearCall>>,
}

impl ClearRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<ClearCall> {
        self.calls.lock().clone()
    }

    /// Patterns of pattern-scoped calls, in order
    pub fn patterns(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ClearCall::Pattern(p) => Some(p.clone()),
                ClearCall::All => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Drain recorded calls
    pub fn take(&self) -> Vec<ClearCall> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl CacheStore for ClearRecorder {
    fn clear_all(&self) {
        self.calls.lock().push(ClearCall::All);
    }

    fn clear_matching(&self, pattern: &str) {
        self.calls.lock().push(ClearCall::Pattern(pattern.to_string()));
    }
}

/// Cached API response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedResponse {
    pub body: serde_json::Value,
    /// Insertion time (epoch ms)
    pub stored_at_ms: u64,
}

/// Concurrent in-memory response cache keyed by request path
///
/// A pattern matches every path it prefixes, so `/fishing/info` drops
/// `/fishing/info` and `/fishing/info?area=2` alike.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<String, CachedResponse>,
    evictions: AtomicU64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, body: serde_json::Value, stored_at_ms: u64) {
        self.entries
            .insert(path.into(), CachedResponse { body, stored_at_ms });
    }

    pub fn get(&self, path: &str) -> Option<CachedResponse> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries dropped by clear calls
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

impl CacheStore for ResponseCache {
    fn clear_all(&self) {
        let mut dropped = 0u64;
        self.entries.retain(|_, _| {
            dropped += 1;
            false
        });
        self.evictions.fetch_add(dropped, Ordering::Relaxed);
        log::trace!("Response cache cleared ({} entries)", dropped);
    }

    fn clear_matching(&self, pattern: &str) {
        let mut dropped = 0u64;
        self.entries.retain(|path, _| {
            let stale = path.starts_with(pattern);
            if stale {
                dropped += 1;
            }
            !stale
        });
        self.evictions.fetch_add(dropped, Ordering::Relaxed);
        log::trace!("Response cache cleared '{}' ({} entries)", pattern, dropped);
    }
}
