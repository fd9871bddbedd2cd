//! Visibility watcher
//!
//! Tracks how long the page stayed hidden and, on re-focus, clears the cache
//! patterns of every staleness tier the hidden time reached. Page components
//! register callbacks that are told the tier and elapsed time on every
//! transition back to visible.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;

use super::source::{PageVisibility, VisibilitySource};
use super::tiers::{StalenessThresholds, StalenessTier};
use crate::registry::clock::Clock;
use crate::registry::store::CacheStore;

/// Per-page callback: `(tier, elapsed_ms)`; tier is `None` below every threshold
pub type VisibilityCallback = Arc<dyn Fn(Option<StalenessTier>, u64) + Send + Sync>;

/// Hook fired once per sweep that reached a tier
pub type StaleHook = Arc<dyn Fn(StalenessTier, u64) + Send + Sync>;

/// Options for [`VisibilityWatcher::init`]
#[derive(Clone, Default)]
pub struct VisibilityOptions {
    pub on_stale: Option<StaleHook>,
    pub debug: bool,
}

impl VisibilityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_stale(mut self, hook: impl Fn(StalenessTier, u64) + Send + Sync + 'static) -> Self {
        self.on_stale = Some(Arc::new(hook));
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl std::fmt::Debug for VisibilityOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityOptions")
            .field("on_stale", &self.on_stale.is_some())
            .field("debug", &self.debug)
            .finish()
    }
}

/// Result of one staleness sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepOutcome {
    pub tier: Option<StalenessTier>,
    pub elapsed_ms: u64,
    /// Clear calls issued against the store
    pub cleared_patterns: usize,
    pub callbacks_invoked: usize,
    /// Callbacks that panicked
    pub callback_failures: usize,
}

#[derive(Default)]
struct WatcherState {
    initialized: bool,
    last_hidden_at: Option<u64>,
    on_stale: Option<StaleHook>,
    debug: bool,
}

struct CallbackEntry {
    token: u64,
    callback: VisibilityCallback,
}

/// Visibility-driven staleness sweeper and callback registry
pub struct VisibilityWatcher {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    thresholds: StalenessThresholds,
    state: Mutex<WatcherState>,
    callbacks: Mutex<IndexMap<String, CallbackEntry>>,
    next_token: AtomicU64,
}

impl VisibilityWatcher {
    pub fn new(
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        thresholds: StalenessThresholds,
    ) -> Self {
        Self {
            store,
            clock,
            thresholds,
            state: Mutex::new(WatcherState::default()),
            callbacks: Mutex::new(IndexMap::new()),
            next_token: AtomicU64::new(1),
        }
    }

    pub fn thresholds(&self) -> StalenessThresholds {
        self.thresholds
    }

    /// Register or replace the callback stored under `id`
    pub fn register(
        self: &Arc<Self>,
        id: impl Into<String>,
        callback: impl Fn(Option<StalenessTier>, u64) + Send + Sync + 'static,
    ) -> VisibilityRegistration {
        let id = id.into();
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.callbacks.lock().insert(
            id.clone(),
            CallbackEntry {
                token,
                callback: Arc::new(callback),
            },
        );

        VisibilityRegistration {
            watcher: Arc::downgrade(self),
            id,
            token,
        }
    }

    fn unregister(&self, id: &str, token: u64) -> bool {
        let mut callbacks = self.callbacks.lock();
        match callbacks.get(id) {
            Some(entry) if entry.token == token => callbacks.shift_remove(id).is_some(),
            _ => false,
        }
    }

    /// Registered callback ids in registration order
    pub fn registered_ids(&self) -> Vec<String> {
        self.callbacks.lock().keys().cloned().collect()
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.lock().len()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// Epoch ms of the last transition to hidden
    pub fn last_hidden_at(&self) -> Option<u64> {
        self.state.lock().last_hidden_at
    }

    /// Milliseconds since the last transition to hidden, 0 if never hidden
    pub fn elapsed_hidden_ms(&self) -> u64 {
        match self.state.lock().last_hidden_at {
            Some(hidden_at) => self.clock.now_ms().saturating_sub(hidden_at),
            None => 0,
        }
    }

    /// Attach to `source`. Only the first call has any effect.
    ///
    /// Returns whether a listener was attached.
    pub fn init(self: &Arc<Self>, source: &dyn VisibilitySource, options: VisibilityOptions) -> bool {
        {
            let mut state = self.state.lock();
            if state.initialized {
                if options.debug || state.debug {
                    log::debug!("Visibility handler already initialized");
                }
                return false;
            }
            state.initialized = true;
            state.on_stale = options.on_stale;
            state.debug = options.debug;
        }

        let watcher = Arc::downgrade(self);
        source.subscribe(Box::new(move |visibility| {
            if let Some(watcher) = watcher.upgrade() {
                watcher.handle(visibility);
            }
        }));
        true
    }

    /// Apply one visibility transition
    ///
    /// Transitions delivered before [`init`](Self::init) are ignored.
    pub fn handle(&self, visibility: PageVisibility) -> Option<SweepOutcome> {
        let now = self.clock.now_ms();
        let elapsed = {
            let mut state = self.state.lock();
            if !state.initialized {
                log::trace!("Ignoring visibility transition before initialization");
                return None;
            }
            match visibility {
                PageVisibility::Hidden => {
                    state.last_hidden_at = Some(now);
                    return None;
                }
                PageVisibility::Visible => state
                    .last_hidden_at
                    .map(|hidden_at| now.saturating_sub(hidden_at))
                    .unwrap_or(0),
            }
        };

        let tier = self.thresholds.classify(elapsed);
        Some(self.sweep(tier, elapsed))
    }

    /// Clear `tier` and every lower tier, fire the stale hook, then every
    /// registered callback. Callback panics are logged and contained.
    pub fn sweep(&self, tier: Option<StalenessTier>, elapsed_ms: u64) -> SweepOutcome {
        let (on_stale, debug) = {
            let state = self.state.lock();
            (state.on_stale.clone(), state.debug)
        };

        let mut cleared_patterns = 0;
        if let Some(tier) = tier {
            for level in tier.cumulative() {
                for pattern in level.patterns() {
                    self.store.clear_matching(pattern);
                    cleared_patterns += 1;
                }
            }
            if debug {
                log::info!(
                    "Page hidden for {}ms, cleared {} tier ({} patterns)",
                    elapsed_ms,
                    tier,
                    cleared_patterns
                );
            }
            if let Some(hook) = on_stale
                && let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| hook(tier, elapsed_ms)))
            {
                log::error!("Stale hook panicked: {}", panic_message(payload.as_ref()));
            }
        }

        // Snapshot so callbacks may register or unregister without deadlocking
        let snapshot: Vec<(String, VisibilityCallback)> = self
            .callbacks
            .lock()
            .iter()
            .map(|(id, entry)| (id.clone(), Arc::clone(&entry.callback)))
            .collect();

        let mut callbacks_invoked = 0;
        let mut callback_failures = 0;
        for (id, callback) in snapshot {
            callbacks_invoked += 1;
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(tier, elapsed_ms))) {
                callback_failures += 1;
                log::error!(
                    "Visibility callback '{}' panicked: {}",
                    id,
                    panic_message(payload.as_ref())
                );
            }
        }

        SweepOutcome {
            tier,
            elapsed_ms,
            cleared_patterns,
            callbacks_invoked,
            callback_failures,
        }
    }
}

impl std::fmt::Debug for VisibilityWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityWatcher")
            .field("thresholds", &self.thresholds)
            .field("initialized", &self.is_initialized())
            .field("callbacks", &self.registered_ids())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Handle returned by [`VisibilityWatcher::register`]
///
/// Dropping the handle keeps the callback registered; call
/// [`unregister`](Self::unregister) to remove it.
#[derive(Debug)]
pub struct VisibilityRegistration {
    watcher: Weak<VisibilityWatcher>,
    id: String,
    token: u64,
}

impl VisibilityRegistration {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Remove the callback. A later registration under the same id is left
    /// in place. Returns whether anything was removed.
    pub fn unregister(self) -> bool {
        match self.watcher.upgrade() {
            Some(watcher) => watcher.unregister(&self.id, self.token),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::registry::clock::ManualClock;
    use crate::registry::store::ClearRecorder;
    use crate::registry::visibility::source::ManualVisibility;

    struct Harness {
        recorder: Arc<ClearRecorder>,
        clock: Arc<ManualClock>,
        source: ManualVisibility,
        watcher: Arc<VisibilityWatcher>,
    }

    fn harness() -> Harness {
        let recorder = Arc::new(ClearRecorder::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let watcher = Arc::new(VisibilityWatcher::new(
            recorder.clone(),
            clock.clone(),
            StalenessThresholds::default(),
        ));
        let source = ManualVisibility::new();
        watcher.init(&source, VisibilityOptions::default());
        Harness {
            recorder,
            clock,
            source,
            watcher,
        }
    }

    fn hide_for(h: &Harness, elapsed_ms: u64) {
        h.source.emit(PageVisibility::Hidden);
        h.clock.advance(elapsed_ms);
        h.source.emit(PageVisibility::Visible);
    }

    #[test]
    fn test_init_is_idempotent() {
        let h = harness();
        assert!(h.watcher.is_initialized());
        assert!(!h.watcher.init(&h.source, VisibilityOptions::default()));
        assert_eq!(h.source.listener_count(), 1);
    }

    #[test]
    fn test_normal_tier_clears_critical_and_normal() {
        let h = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _reg = h.watcher.register("page", move |tier, elapsed| {
            sink.lock().push((tier, elapsed));
        });

        hide_for(&h, 150_000);

        let expected: HashSet<String> = StalenessTier::Critical
            .patterns()
            .iter()
            .chain(StalenessTier::Normal.patterns())
            .map(|p| p.to_string())
            .collect();
        let cleared: HashSet<String> = h.recorder.patterns().into_iter().collect();
        assert_eq!(cleared, expected);
        assert!(
            !h.recorder
                .patterns()
                .iter()
                .any(|p| StalenessTier::Static.patterns().contains(&p.as_str()))
        );
        assert_eq!(
            *seen.lock(),
            vec![(Some(StalenessTier::Normal), 150_000)]
        );
    }

    #[test]
    fn test_short_absence_clears_nothing_but_notifies() {
        let h = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _reg = h.watcher.register("page", move |tier, elapsed| {
            sink.lock().push((tier, elapsed));
        });

        hide_for(&h, 5_000);

        assert!(h.recorder.is_empty());
        assert_eq!(*seen.lock(), vec![(None, 5_000)]);
    }

    #[test]
    fn test_static_tier_clears_everything_tiered() {
        let h = harness();
        hide_for(&h, 600_000);
        let total: usize = StalenessTier::ALL.iter().map(|t| t.patterns().len()).sum();
        assert_eq!(h.recorder.len(), total);
    }

    #[test]
    fn test_visible_without_hidden_counts_as_zero() {
        let h = harness();
        h.clock.advance(1_000_000);
        h.source.emit(PageVisibility::Visible);
        assert!(h.recorder.is_empty());
    }

    #[test]
    fn test_stale_hook_fires_only_with_tier() {
        let recorder = Arc::new(ClearRecorder::new());
        let clock = Arc::new(ManualClock::new(0));
        let watcher = Arc::new(VisibilityWatcher::new(
            recorder,
            clock.clone(),
            StalenessThresholds::default(),
        ));
        let source = ManualVisibility::new();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        watcher.init(
            &source,
            VisibilityOptions::new().on_stale(move |tier, elapsed| sink.lock().push((tier, elapsed))),
        );

        source.emit(PageVisibility::Hidden);
        clock.advance(1_000);
        source.emit(PageVisibility::Visible);
        source.emit(PageVisibility::Hidden);
        clock.advance(45_000);
        source.emit(PageVisibility::Visible);

        assert_eq!(*fired.lock(), vec![(StalenessTier::Critical, 45_000)]);
    }

    #[test]
    fn test_panicking_stale_hook_does_not_block_callbacks() {
        let recorder = Arc::new(ClearRecorder::new());
        let clock = Arc::new(ManualClock::new(0));
        let watcher = Arc::new(VisibilityWatcher::new(
            recorder.clone(),
            clock.clone(),
            StalenessThresholds::default(),
        ));
        let source = ManualVisibility::new();
        watcher.init(
            &source,
            VisibilityOptions::new().on_stale(|_, _| panic!("hook failed")),
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _reg = watcher.register("page", move |tier, elapsed| {
            sink.lock().push((tier, elapsed));
        });

        source.emit(PageVisibility::Hidden);
        clock.advance(45_000);
        source.emit(PageVisibility::Visible);

        assert_eq!(*seen.lock(), vec![(Some(StalenessTier::Critical), 45_000)]);
        assert_eq!(recorder.len(), StalenessTier::Critical.patterns().len());
    }

    #[test]
    fn test_panicking_callback_is_isolated() {
        let h = harness();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _bad = h.watcher.register("bad", |_, _| panic!("boom"));
        let _good = h.watcher.register("good", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = h.watcher.sweep(None, 10);
        assert_eq!(outcome.callbacks_invoked, 2);
        assert_eq!(outcome.callback_failures, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        hide_for(&h, 10);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reregistration_replaces_callback() {
        let h = harness();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let (f, s) = (Arc::clone(&first), Arc::clone(&second));

        let stale = h.watcher.register("x", move |_, _| {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let current = h.watcher.register("x", move |_, _| {
            s.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(h.watcher.registered_ids(), vec!["x".to_string()]);

        hide_for(&h, 1_000);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        // the superseded handle must not remove the replacement
        assert!(!stale.unregister());
        assert_eq!(h.watcher.callback_count(), 1);
        assert!(current.unregister());
        assert_eq!(h.watcher.callback_count(), 0);
    }

    #[test]
    fn test_callback_may_unregister_itself_during_sweep() {
        let h = harness();
        let slot: Arc<Mutex<Option<VisibilityRegistration>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let reg = h.watcher.register("once", move |_, _| {
            if let Some(reg) = inner.lock().take() {
                reg.unregister();
            }
        });
        *slot.lock() = Some(reg);

        hide_for(&h, 1_000);
        assert_eq!(h.watcher.callback_count(), 0);
    }

    #[test]
    fn test_elapsed_hidden_tracking() {
        let h = harness();
        assert_eq!(h.watcher.elapsed_hidden_ms(), 0);
        assert_eq!(h.watcher.last_hidden_at(), None);
        h.source.emit(PageVisibility::Hidden);
        h.clock.advance(2_500);
        assert_eq!(h.watcher.elapsed_hidden_ms(), 2_500);
        assert_eq!(h.watcher.last_hidden_at(), Some(1_000_000));
    }

    #[test]
    fn test_transitions_before_init_are_ignored() {
        let recorder = Arc::new(ClearRecorder::new());
        let watcher = VisibilityWatcher::new(
            recorder.clone(),
            Arc::new(ManualClock::new(0)),
            StalenessThresholds::default(),
        );
        assert_eq!(watcher.handle(PageVisibility::Hidden), None);
        assert_eq!(watcher.last_hidden_at(), None);
    }
}
