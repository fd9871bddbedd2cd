//! Invalidation audit log
//!
//! Bounded history of successful dispatches. The buffer keeps the most recent
//! [`AUDIT_LOG_CAPACITY`] events; a shorter tail is mirrored into session
//! storage after every append so it survives a reload.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::session::{SessionStore, best_effort};

/// Maximum events retained in memory
pub const AUDIT_LOG_CAPACITY: usize = 100;

/// Default number of trailing events mirrored to session storage
pub const DEFAULT_PERSISTED_EVENTS: usize = 20;

/// Default session key holding the persisted tail
pub const DEFAULT_STORAGE_KEY: &str = "cacheInvalidationLog";

/// One successful dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Action identifier
    pub action: String,
    /// Dispatch time (epoch ms)
    pub timestamp: u64,
    /// Handler wall-clock duration in milliseconds
    pub duration: f64,
    /// Reloaded from session storage rather than recorded by this registry
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub restored: bool,
}

/// Aggregates over the retained events
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditStats {
    pub total_events: usize,
    /// Invocation count per action identifier
    pub by_action: BTreeMap<String, u64>,
    /// Mean handler duration in milliseconds (0 when empty)
    pub average_duration_ms: f64,
    pub restored_count: usize,
}

/// Ring buffer of audit events, oldest evicted first
#[derive(Debug, Default)]
pub struct AuditLog {
    events: ArrayVec<AuditEvent, AUDIT_LOG_CAPACITY>,
    restored: bool,
    /// Tail left by an earlier registry, captured before our first overwrite
    inherited: Option<Vec<AuditEvent>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, evicting the oldest when full
    pub fn record(&mut self, event: AuditEvent) {
        if self.events.is_full() {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Up to `count` most recent events, oldest first
    pub fn tail(&self, count: usize) -> &[AuditEvent] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn stats(&self) -> AuditStats {
        let mut by_action = BTreeMap::new();
        let mut total_duration = 0.0;
        let mut restored_count = 0;

        for event in &self.events {
            *by_action.entry(event.action.clone()).or_insert(0) += 1;
            total_duration += event.duration;
            if event.restored {
                restored_count += 1;
            }
        }

        let average_duration_ms = if self.events.is_empty() {
            0.0
        } else {
            total_duration / self.events.len() as f64
        };

        AuditStats {
            total_events: self.events.len(),
            by_action,
            average_duration_ms,
            restored_count,
        }
    }

    /// Overwrite the persisted tail with the last `count` events.
    ///
    /// The first write from a log that has not restored yet captures the
    /// stored tail so a later [`restore`](Self::restore) still sees it.
    pub fn persist(&mut self, session: &dyn SessionStore, key: &str, count: usize) {
        if !self.restored && self.inherited.is_none() {
            self.inherited = Some(load_persisted(session, key));
        }
        let _ = best_effort("audit persist", || {
            let encoded = serde_json::to_string(self.tail(count))?;
            session.set(key, &encoded)
        });
    }

    /// Whether persisted events were already merged into this log
    pub fn has_restored(&self) -> bool {
        self.restored
    }

    /// Merge events persisted by an earlier registry ahead of the current ones.
    ///
    /// Runs at most once per log. Events this log wrote itself are never
    /// reloaded. Unreadable or undecodable storage counts as "no prior
    /// events". Returns the number of events restored.
    pub fn restore(&mut self, session: &dyn SessionStore, key: &str) -> usize {
        if self.restored {
            return 0;
        }
        self.restored = true;

        let persisted = match self.inherited.take() {
            Some(inherited) => inherited,
            None => load_persisted(session, key),
        };
        if persisted.is_empty() {
            return 0;
        }

        let current = std::mem::take(&mut self.events);
        let restored_count = persisted.len();
        for mut event in persisted {
            event.restored = true;
            self.record(event);
        }
        for event in current {
            self.record(event);
        }

        log::debug!("Restored {} audit events from session storage", restored_count);
        restored_count
    }
}

fn load_persisted(session: &dyn SessionStore, key: &str) -> Vec<AuditEvent> {
    best_effort("audit restore", || {
        Ok(match session.get(key)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        })
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::session::MemorySessionStore;

    fn event(action: &str, timestamp: u64, duration: f64) -> AuditEvent {
        AuditEvent {
            action: action.to_string(),
            timestamp,
            duration,
            restored: false,
        }
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let mut log = AuditLog::new();
        for i in 0..150 {
            log.record(event("fishing:catch", i, 1.0));
        }
        assert_eq!(log.len(), AUDIT_LOG_CAPACITY);
        assert_eq!(log.events()[0].timestamp, 50);
        assert_eq!(log.events()[99].timestamp, 149);
        assert_eq!(log.tail(10)[0].timestamp, 140);
    }

    #[test]
    fn test_stats() {
        let mut log = AuditLog::new();
        assert_eq!(log.stats().average_duration_ms, 0.0);

        log.record(event("fishing:catch", 1, 2.0));
        log.record(event("fishing:catch", 2, 4.0));
        log.record(event("gacha:roll", 3, 6.0));

        let stats = log.stats();
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.by_action["fishing:catch"], 2);
        assert_eq!(stats.by_action["gacha:roll"], 1);
        assert!((stats.average_duration_ms - 4.0).abs() < f64::EPSILON);
        assert_eq!(stats.restored_count, 0);
    }

    #[test]
    fn test_persist_writes_tail_only() {
        let session = MemorySessionStore::new();
        let mut log = AuditLog::new();
        for i in 0..30 {
            log.record(event("dojo:claim", i, 0.5));
        }
        log.persist(&session, DEFAULT_STORAGE_KEY, DEFAULT_PERSISTED_EVENTS);

        let raw = session.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let persisted: Vec<AuditEvent> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), DEFAULT_PERSISTED_EVENTS);
        assert_eq!(persisted[0].timestamp, 10);
        assert!(!raw.contains("restored"));
    }

    #[test]
    fn test_persist_failure_is_swallowed() {
        let session = MemorySessionStore::with_quota(8);
        let mut log = AuditLog::new();
        log.record(event("dojo:claim", 1, 0.5));
        log.persist(&session, DEFAULT_STORAGE_KEY, DEFAULT_PERSISTED_EVENTS);
        assert_eq!(session.get(DEFAULT_STORAGE_KEY).unwrap(), None);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_restore_prepends_and_flags() {
        let session = MemorySessionStore::new();
        let previous = vec![event("gacha:roll", 1, 1.0), event("gacha:roll", 2, 1.0)];
        session
            .set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&previous).unwrap())
            .unwrap();

        let mut log = AuditLog::new();
        log.record(event("fishing:catch", 10, 1.0));

        assert_eq!(log.restore(&session, DEFAULT_STORAGE_KEY), 2);
        assert_eq!(log.len(), 3);
        assert!(log.events()[0].restored);
        assert!(log.events()[1].restored);
        assert!(!log.events()[2].restored);
        assert_eq!(log.events()[2].action, "fishing:catch");
        assert_eq!(log.stats().restored_count, 2);

        // second restore is a no-op
        assert_eq!(log.restore(&session, DEFAULT_STORAGE_KEY), 0);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_restore_skips_events_written_by_this_log() {
        let session = MemorySessionStore::new();
        let mut log = AuditLog::new();
        for i in 0..3 {
            log.record(event("gacha:roll", i, 1.0));
            log.persist(&session, DEFAULT_STORAGE_KEY, DEFAULT_PERSISTED_EVENTS);
        }

        assert_eq!(log.restore(&session, DEFAULT_STORAGE_KEY), 0);
        let stats = log.stats();
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.restored_count, 0);
        assert_eq!(stats.by_action["gacha:roll"], 3);
    }

    #[test]
    fn test_restore_after_dispatches_keeps_earlier_tail() {
        let session = MemorySessionStore::new();
        let previous = vec![event("coupon:redeem", 1, 1.0)];
        session
            .set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&previous).unwrap())
            .unwrap();

        let mut log = AuditLog::new();
        for i in 10..12 {
            log.record(event("dojo:claim", i, 1.0));
            log.persist(&session, DEFAULT_STORAGE_KEY, DEFAULT_PERSISTED_EVENTS);
        }

        assert_eq!(log.restore(&session, DEFAULT_STORAGE_KEY), 1);
        assert_eq!(log.len(), 3);
        assert_eq!(log.events()[0].action, "coupon:redeem");
        assert!(log.events()[0].restored);
        assert_eq!(log.stats().by_action["dojo:claim"], 2);
    }

    #[test]
    fn test_restore_tolerates_garbage() {
        let session = MemorySessionStore::new();
        session.set(DEFAULT_STORAGE_KEY, "[{\"oops\":").unwrap();
        let mut log = AuditLog::new();
        assert_eq!(log.restore(&session, DEFAULT_STORAGE_KEY), 0);
        assert!(log.is_empty());
        assert!(log.has_restored());
    }
}
