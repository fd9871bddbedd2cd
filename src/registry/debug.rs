//! Developer debug namespace
//!
//! A single process-wide slot holding a [`DebugHandle`] plus a verbose-logging
//! flag consulted by every dispatch. Both are off by default. Everything here
//! is a no-op when nothing is installed.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::catalog::Action;
use super::dispatch::{AuditReport, CacheState, InvalidateOptions, InvalidationDispatcher};
use super::error::RegistryResult;
use super::visibility::{StalenessTier, SweepOutcome};

static DEBUG_HANDLE: Lazy<RwLock<Option<DebugHandle>>> = Lazy::new(|| RwLock::new(None));

static VERBOSE_LOGGING: AtomicBool = AtomicBool::new(false);

/// Whether dispatches log at info level without being asked to
pub fn verbose_logging_enabled() -> bool {
    VERBOSE_LOGGING.load(Ordering::Relaxed)
}

pub fn set_verbose_logging(enabled: bool) {
    VERBOSE_LOGGING.store(enabled, Ordering::Relaxed);
}

/// Install a debug handle for `dispatcher` and turn on verbose logging.
///
/// Also merges the persisted audit tail into the dispatcher's log the first
/// time debugging is enabled for it.
pub fn enable_cache_debugging(dispatcher: &Arc<InvalidationDispatcher>) -> DebugHandle {
    let restored = dispatcher.restore_audit();
    let handle = DebugHandle {
        dispatcher: Arc::clone(dispatcher),
    };
    *DEBUG_HANDLE.write() = Some(handle.clone());
    set_verbose_logging(true);
    log::info!(
        "Cache debugging enabled ({} actions, {} restored events)",
        handle.action_types().len(),
        restored
    );
    handle
}

/// Remove the installed handle and turn verbose logging off.
///
/// Returns whether a handle was installed.
pub fn disable_cache_debugging() -> bool {
    let removed = DEBUG_HANDLE.write().take().is_some();
    set_verbose_logging(false);
    if removed {
        log::info!("Cache debugging disabled");
    }
    removed
}

/// The currently installed handle, if any
pub fn debug_handle() -> Option<DebugHandle> {
    DEBUG_HANDLE.read().clone()
}

/// Console-style access to a dispatcher's operations and tables
#[derive(Debug, Clone)]
pub struct DebugHandle {
    dispatcher: Arc<InvalidationDispatcher>,
}

impl DebugHandle {
    pub fn action_types(&self) -> Vec<&'static str> {
        self.dispatcher.action_types()
    }

    pub fn patterns(&self, action: &str) -> Option<Vec<&'static str>> {
        self.dispatcher.invalidation_patterns(action)
    }

    /// Every action with the patterns it reports, keyed by identifier
    pub fn pattern_table(&self) -> BTreeMap<&'static str, Vec<&'static str>> {
        Action::all()
            .into_iter()
            .map(|action| (action.id(), action.clear_scope().reported_patterns()))
            .collect()
    }

    pub fn tier_patterns(&self, tier: StalenessTier) -> &'static [&'static str] {
        tier.patterns()
    }

    /// Dispatch with logging forced on
    pub fn invalidate(&self, action: &str) -> RegistryResult<bool> {
        self.dispatcher
            .invalidate_for(action, InvalidateOptions::debug())
    }

    /// Manually run the staleness sweep for `tier`
    pub fn trigger_staleness(&self, tier: StalenessTier) -> SweepOutcome {
        self.dispatcher.trigger_staleness(tier)
    }

    pub fn cache_state(&self) -> CacheState {
        self.dispatcher.cache_state()
    }

    pub fn audit_log(&self) -> AuditReport {
        self.dispatcher.audit_log()
    }
}
