//! Public API for the cache invalidation registry
//!
//! [`CacheBust`] wraps an [`InvalidationDispatcher`] behind an `Arc` so hosts
//! can hand clones to every page and service that performs mutations.

use std::sync::Arc;

use crate::registry::catalog::Action;
use crate::registry::clock::{Clock, SystemClock};
use crate::registry::config::{BuildMode, RegistryConfig};
use crate::registry::debug::{self, DebugHandle};
use crate::registry::dispatch::{
    AuditReport, CacheState, DispatchCounters, InvalidateOptions, InvalidationDispatcher,
};
use crate::registry::error::RegistryResult;
use crate::registry::session::{MemorySessionStore, SessionStore};
use crate::registry::store::{CacheStore, ResponseCache};
use crate::registry::visibility::{
    StalenessThresholds, StalenessTier, SweepOutcome, VisibilityOptions, VisibilityRegistration,
    VisibilitySource,
};

/// Cache invalidation registry handle
#[derive(Debug, Clone)]
pub struct CacheBust {
    // Arc-wrapped so clones share one audit log and callback registry
    dispatcher: Arc<InvalidationDispatcher>,
}

impl CacheBust {
    pub fn builder() -> CacheBustBuilder {
        CacheBustBuilder::new()
    }

    /// Registry over an in-memory response cache and session store
    pub fn new() -> RegistryResult<Self> {
        Self::builder().build()
    }

    /// Invalidate the cache areas touched by `action`.
    ///
    /// Unknown identifiers fail in development mode and return `Ok(false)`
    /// in production mode.
    pub fn invalidate_for(&self, action: &str) -> RegistryResult<bool> {
        self.dispatcher
            .invalidate_for(action, InvalidateOptions::default())
    }

    pub fn invalidate_for_with(
        &self,
        action: &str,
        options: InvalidateOptions,
    ) -> RegistryResult<bool> {
        self.dispatcher.invalidate_for(action, options)
    }

    /// Typed dispatch, which cannot miss
    pub fn invalidate(&self, action: Action) -> bool {
        self.dispatcher.invalidate(action)
    }

    pub fn action_types(&self) -> Vec<&'static str> {
        self.dispatcher.action_types()
    }

    pub fn invalidation_patterns(&self, action: &str) -> Option<Vec<&'static str>> {
        self.dispatcher.invalidation_patterns(action)
    }

    pub fn on_visibility_change(
        &self,
        id: impl Into<String>,
        callback: impl Fn(Option<StalenessTier>, u64) + Send + Sync + 'static,
    ) -> VisibilityRegistration {
        self.dispatcher.on_visibility_change(id, callback)
    }

    pub fn init_visibility_handler(
        &self,
        source: &dyn VisibilitySource,
        options: VisibilityOptions,
    ) -> bool {
        self.dispatcher.init_visibility_handler(source, options)
    }

    pub fn trigger_staleness(&self, tier: StalenessTier) -> SweepOutcome {
        self.dispatcher.trigger_staleness(tier)
    }

    pub fn cache_state(&self) -> CacheState {
        self.dispatcher.cache_state()
    }

    pub fn audit_log(&self) -> AuditReport {
        self.dispatcher.audit_log()
    }

    pub fn dispatch_counters(&self) -> DispatchCounters {
        self.dispatcher.dispatch_counters()
    }

    pub fn config(&self) -> &RegistryConfig {
        self.dispatcher.config()
    }

    /// Install this registry as the process-wide debug handle
    pub fn enable_debugging(&self) -> DebugHandle {
        debug::enable_cache_debugging(&self.dispatcher)
    }

    pub fn dispatcher(&self) -> &Arc<InvalidationDispatcher> {
        &self.dispatcher
    }
}

/// Fluent builder for [`CacheBust`]
pub struct CacheBustBuilder {
    config: RegistryConfig,
    store: Option<Arc<dyn CacheStore>>,
    session: Option<Arc<dyn SessionStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CacheBustBuilder {
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
            store: None,
            session: None,
            clock: None,
        }
    }

    /// Start from a loaded configuration
    pub fn from_config(config: RegistryConfig) -> Self {
        Self::new().config(config)
    }

    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Cache the dispatcher clears; defaults to a fresh [`ResponseCache`]
    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Storage for the persisted audit tail; defaults to in-memory
    pub fn session_store(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build_mode(mut self, mode: BuildMode) -> Self {
        self.config.build_mode = mode;
        self
    }

    pub fn thresholds(mut self, thresholds: StalenessThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Number of trailing audit events mirrored to session storage
    pub fn persisted_events(mut self, count: usize) -> Self {
        self.config.persisted_events = count;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    pub fn restore_audit_on_start(mut self, enabled: bool) -> Self {
        self.config.restore_audit_on_start = enabled;
        self
    }

    /// Validate the configuration and assemble the registry
    pub fn build(self) -> RegistryResult<CacheBust> {
        let store: Arc<dyn CacheStore> = match self.store {
            Some(store) => store,
            None => Arc::new(ResponseCache::new()),
        };
        let session: Arc<dyn SessionStore> = match self.session {
            Some(session) => session,
            None => Arc::new(MemorySessionStore::new()),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        let dispatcher = InvalidationDispatcher::new(store, session, clock, self.config)?;
        Ok(CacheBust {
            dispatcher: Arc::new(dispatcher),
        })
    }
}

impl Default for CacheBustBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::catalog::GachaAction;
    use crate::registry::clock::ManualClock;
    use crate::registry::error::RegistryError;
    use crate::registry::store::ClearRecorder;

    #[test]
    fn test_builder_overrides_apply() {
        let recorder = Arc::new(ClearRecorder::new());
        let cache = CacheBust::builder()
            .store(recorder.clone())
            .clock(Arc::new(ManualClock::new(42)))
            .build_mode(BuildMode::Production)
            .persisted_events(5)
            .storage_key("audit")
            .build()
            .unwrap();

        assert_eq!(cache.config().persisted_events, 5);
        assert_eq!(cache.config().storage_key, "audit");
        assert_eq!(cache.invalidate_for("gacha:nope"), Ok(false));
        assert!(recorder.is_empty());

        assert!(cache.invalidate(Action::Gacha(GachaAction::Roll)));
        assert!(!recorder.is_empty());
        assert_eq!(cache.audit_log().events[0].timestamp, 42);
    }

    #[test]
    fn test_build_rejects_invalid_thresholds() {
        let err = CacheBust::builder()
            .thresholds(StalenessThresholds {
                critical_ms: 10,
                normal_ms: 5,
                static_ms: 20,
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_clones_share_audit_log() {
        let cache = CacheBust::builder()
            .build_mode(BuildMode::Development)
            .build()
            .unwrap();
        let other = cache.clone();
        other.invalidate_for("coupon:redeem").unwrap();
        assert_eq!(cache.audit_log().events.len(), 1);
    }

    #[test]
    fn test_default_store_drops_matching_responses() {
        let responses = Arc::new(ResponseCache::new());
        responses.insert("/fishing/info?area=1", serde_json::json!({"ok": true}), 0);
        responses.insert("/banners", serde_json::json!([]), 0);

        let cache = CacheBust::builder().store(responses.clone()).build().unwrap();
        cache.invalidate_for("fishing:catch").unwrap();

        assert!(!responses.contains("/fishing/info?area=1"));
        assert!(responses.contains("/banners"));
    }
}
