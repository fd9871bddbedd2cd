//! Invalidation dispatcher
//!
//! Resolves an action to its clear scope, drives the cache store, and keeps
//! the audit trail. Owns the visibility watcher so that one registry instance
//! carries all mutable invalidation state for the application.

pub mod patterns;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use serde::Serialize;

use self::patterns::{ClearScope, lookup_patterns};
use super::audit::{AuditEvent, AuditLog, AuditStats};
use super::catalog::Action;
use super::clock::Clock;
use super::config::{BuildMode, RegistryConfig};
use super::debug::verbose_logging_enabled;
use super::error::RegistryResult;
use super::session::SessionStore;
use super::store::CacheStore;
use super::visibility::{
    StalenessTier, SweepOutcome, VisibilityOptions, VisibilityRegistration, VisibilitySource,
    VisibilityWatcher,
};

/// Number of recent events embedded in [`CacheState`]
pub const RECENT_EVENTS_IN_STATE: usize = 10;

/// Per-call dispatch options
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidateOptions {
    /// Log this dispatch regardless of the global debug flag
    pub debug: bool,
}

impl InvalidateOptions {
    pub fn debug() -> Self {
        Self { debug: true }
    }
}

/// Lock-free dispatch counters
#[derive(Debug, Default)]
pub struct DispatchStatistics {
    invocations: CachePadded<AtomicU64>,
    unknown_actions: CachePadded<AtomicU64>,
    clear_calls: CachePadded<AtomicU64>,
}

impl DispatchStatistics {
    pub fn snapshot(&self) -> DispatchCounters {
        DispatchCounters {
            invocations: self.invocations.load(Ordering::Relaxed),
            unknown_actions: self.unknown_actions.load(Ordering::Relaxed),
            clear_calls: self.clear_calls.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DispatchStatistics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchCounters {
    /// Successful dispatches since construction
    pub invocations: u64,
    /// Unknown identifiers rejected in production mode
    pub unknown_actions: u64,
    /// Clear calls issued to the store by dispatches
    pub clear_calls: u64,
}

/// Diagnostic snapshot of the registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheState {
    pub registered_callbacks: usize,
    pub registered_callback_ids: Vec<String>,
    /// RFC 3339 time of the last hidden transition
    pub last_hidden_time: Option<String>,
    pub elapsed_hidden_ms: u64,
    pub visibility_initialized: bool,
    pub action_count: usize,
    pub recent_events: Vec<AuditEvent>,
}

/// Full audit report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub events: Vec<AuditEvent>,
    pub stats: AuditStats,
    pub dispatch: DispatchCounters,
    pub state: CacheState,
}

/// Every identifier the dispatcher handles, in catalog order
pub fn action_types() -> Vec<&'static str> {
    Action::all().into_iter().map(Action::id).collect()
}

/// Action-driven cache invalidation dispatcher
pub struct InvalidationDispatcher {
    store: Arc<dyn CacheStore>,
    session: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
    audit: Mutex<AuditLog>,
    stats: DispatchStatistics,
    visibility: Arc<VisibilityWatcher>,
}

impl InvalidationDispatcher {
    pub fn new(
        store: Arc<dyn CacheStore>,
        session: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> RegistryResult<Self> {
        config.validate()?;

        let visibility = Arc::new(VisibilityWatcher::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.thresholds,
        ));

        let dispatcher = Self {
            store,
            session,
            clock,
            config,
            audit: Mutex::new(AuditLog::new()),
            stats: DispatchStatistics::default(),
            visibility,
        };

        if dispatcher.config.restore_audit_on_start {
            dispatcher.restore_audit();
        }

        Ok(dispatcher)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Invalidate the cache areas touched by `action`.
    ///
    /// Unknown identifiers are an error in development mode. In production
    /// mode they are logged and reported as `Ok(false)` without side effects.
    pub fn invalidate_for(&self, action: &str, options: InvalidateOptions) -> RegistryResult<bool> {
        match action.parse::<Action>() {
            Ok(action) => Ok(self.invalidate_with(action, options)),
            Err(err) => match self.config.build_mode {
                BuildMode::Development => Err(err),
                BuildMode::Production => {
                    self.stats.unknown_actions.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Unknown cache invalidation action: {}", action);
                    Ok(false)
                }
            },
        }
    }

    /// Typed dispatch with default options
    pub fn invalidate(&self, action: Action) -> bool {
        self.invalidate_with(action, InvalidateOptions::default())
    }

    /// Typed dispatch
    pub fn invalidate_with(&self, action: Action, options: InvalidateOptions) -> bool {
        // Held across clear + append + persist so concurrent dispatches never interleave
        let mut audit = self.audit.lock();

        let started = Instant::now();
        let clear_calls = self.run_handler(action);
        let duration = started.elapsed().as_secs_f64() * 1000.0;

        audit.record(AuditEvent {
            action: action.id().to_string(),
            timestamp: self.clock.now_ms(),
            duration,
            restored: false,
        });
        audit.persist(
            self.session.as_ref(),
            &self.config.storage_key,
            self.config.persisted_events,
        );
        drop(audit);

        self.stats.invocations.fetch_add(1, Ordering::Relaxed);
        self.stats
            .clear_calls
            .fetch_add(clear_calls as u64, Ordering::Relaxed);

        if options.debug || self.config.debug || verbose_logging_enabled() {
            log::info!(
                "Invalidated cache for {} ({} clear calls, {:.3}ms)",
                action,
                clear_calls,
                duration
            );
        }
        true
    }

    fn run_handler(&self, action: Action) -> usize {
        match action.clear_scope() {
            ClearScope::Everything => {
                self.store.clear_all();
                1
            }
            ClearScope::Patterns(patterns) => {
                for pattern in patterns {
                    log::trace!("{} clears {}", action, pattern);
                    self.store.clear_matching(pattern);
                }
                patterns.len()
            }
        }
    }

    /// Every identifier this dispatcher handles
    pub fn action_types(&self) -> Vec<&'static str> {
        action_types()
    }

    /// Patterns an action would clear; `None` for unrecognized identifiers
    pub fn invalidation_patterns(&self, action: &str) -> Option<Vec<&'static str>> {
        lookup_patterns(action)
    }

    pub fn cache_state(&self) -> CacheState {
        let recent_events = self.audit.lock().tail(RECENT_EVENTS_IN_STATE).to_vec();
        self.state_with(recent_events)
    }

    fn state_with(&self, recent_events: Vec<AuditEvent>) -> CacheState {
        let last_hidden_time = self.visibility.last_hidden_at().and_then(|ms| {
            chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms as i64)
                .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        });
        let registered_callback_ids = self.visibility.registered_ids();

        CacheState {
            registered_callbacks: registered_callback_ids.len(),
            registered_callback_ids,
            last_hidden_time,
            elapsed_hidden_ms: self.visibility.elapsed_hidden_ms(),
            visibility_initialized: self.visibility.is_initialized(),
            action_count: Action::all().len(),
            recent_events,
        }
    }

    pub fn audit_log(&self) -> AuditReport {
        let (events, stats, recent) = {
            let audit = self.audit.lock();
            (
                audit.events().to_vec(),
                audit.stats(),
                audit.tail(RECENT_EVENTS_IN_STATE).to_vec(),
            )
        };

        AuditReport {
            events,
            stats,
            dispatch: self.stats.snapshot(),
            state: self.state_with(recent),
        }
    }

    /// Merge the persisted audit tail ahead of the current events (once)
    pub fn restore_audit(&self) -> usize {
        self.audit
            .lock()
            .restore(self.session.as_ref(), &self.config.storage_key)
    }

    /// Register or replace the visibility callback stored under `id`
    pub fn on_visibility_change(
        &self,
        id: impl Into<String>,
        callback: impl Fn(Option<StalenessTier>, u64) + Send + Sync + 'static,
    ) -> VisibilityRegistration {
        self.visibility.register(id, callback)
    }

    /// Attach the staleness sweep to `source`; later calls are no-ops
    pub fn init_visibility_handler(
        &self,
        source: &dyn VisibilitySource,
        options: VisibilityOptions,
    ) -> bool {
        self.visibility.init(source, options)
    }

    /// Run the sweep for `tier` as if the page had been hidden exactly that long
    pub fn trigger_staleness(&self, tier: StalenessTier) -> SweepOutcome {
        let elapsed = self.visibility.thresholds().threshold(tier);
        self.visibility.sweep(Some(tier), elapsed)
    }

    pub fn visibility(&self) -> &Arc<VisibilityWatcher> {
        &self.visibility
    }

    pub fn dispatch_counters(&self) -> DispatchCounters {
        self.stats.snapshot()
    }
}

impl std::fmt::Debug for InvalidationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationDispatcher")
            .field("config", &self.config)
            .field("audit_events", &self.audit.lock().len())
            .field("stats", &self.stats.snapshot())
            .field("visibility", &self.visibility)
            .finish()
    }
}
