//! End-to-end behavior of the invalidation registry through the public API

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use cachebust::prelude::*;
use cachebust::registry::{
    ClearCall, ClearRecorder, FULL_CLEAR_SENTINEL, ManualClock, ManualVisibility,
};

struct Harness {
    cache: CacheBust,
    recorder: Arc<ClearRecorder>,
    clock: Arc<ManualClock>,
}

fn harness(mode: BuildMode) -> Harness {
    let recorder = Arc::new(ClearRecorder::new());
    let clock = Arc::new(ManualClock::new(1_000));
    let cache = CacheBust::builder()
        .store(recorder.clone())
        .clock(clock.clone())
        .build_mode(mode)
        .build()
        .unwrap();
    Harness {
        cache,
        recorder,
        clock,
    }
}

fn patterns(calls: Vec<ClearCall>) -> Vec<String> {
    calls
        .into_iter()
        .map(|call| match call {
            ClearCall::Pattern(p) => p,
            ClearCall::All => "<all>".to_string(),
        })
        .collect()
}

#[test]
fn every_catalog_action_dispatches_and_reports_patterns() {
    let h = harness(BuildMode::Development);
    let ids = h.cache.action_types();

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());

    for id in &ids {
        assert_eq!(h.cache.invalidate_for(id), Ok(true), "{}", id);
        let reported = h.cache.invalidation_patterns(id).unwrap();
        assert!(!reported.is_empty(), "{}", id);
    }
    assert_eq!(h.cache.audit_log().stats.total_events, ids.len().min(100));
}

#[test]
fn fishing_catch_clears_the_same_ordered_set_each_call() {
    let h = harness(BuildMode::Development);
    for _ in 0..3 {
        assert_eq!(h.cache.invalidate_for("fishing:catch"), Ok(true));
        assert_eq!(
            patterns(h.recorder.take()),
            vec![
                "/fishing/info",
                "/fishing/rank",
                "/fishing/inventory",
                "/fishing/challenges",
                "/auth/me",
            ]
        );
    }
}

#[test]
fn unknown_action_fails_fast_in_development_and_warns_in_production() {
    let dev = harness(BuildMode::Development);
    assert!(matches!(
        dev.cache.invalidate_for("fishing:teleport"),
        Err(RegistryError::UnknownAction(_))
    ));
    assert!(dev.recorder.is_empty());

    let prod = harness(BuildMode::Production);
    assert_eq!(prod.cache.invalidate_for("fishing:teleport"), Ok(false));
    assert!(prod.recorder.is_empty());
    assert!(prod.cache.audit_log().events.is_empty());
}

#[test]
fn audit_ring_keeps_the_most_recent_hundred() {
    let h = harness(BuildMode::Development);
    for i in 0..150 {
        h.clock.set(i);
        h.cache.invalidate_for("gacha:roll").unwrap();
    }
    let events = h.cache.audit_log().events;
    assert_eq!(events.len(), 100);
    assert_eq!(events.first().unwrap().timestamp, 50);
    assert_eq!(events.last().unwrap().timestamp, 149);
}

#[test]
fn returning_after_normal_staleness_clears_critical_and_normal() {
    let h = harness(BuildMode::Development);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    h.cache.on_visibility_change("page", move |tier, elapsed| {
        sink.lock().push((tier, elapsed));
    });

    let source = ManualVisibility::new();
    assert!(h.cache.init_visibility_handler(&source, VisibilityOptions::default()));

    source.emit(PageVisibility::Hidden);
    h.clock.advance(150_000);
    source.emit(PageVisibility::Visible);

    let expected: Vec<String> = StalenessTier::Critical
        .patterns()
        .iter()
        .chain(StalenessTier::Normal.patterns())
        .map(|p| p.to_string())
        .collect();
    assert_eq!(patterns(h.recorder.take()), expected);
    assert_eq!(*seen.lock(), vec![(Some(StalenessTier::Normal), 150_000)]);
}

#[test]
fn short_absence_clears_nothing_but_still_notifies() {
    let h = harness(BuildMode::Development);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    h.cache.on_visibility_change("page", move |tier, elapsed| {
        sink.lock().push((tier, elapsed));
    });

    let source = ManualVisibility::new();
    h.cache.init_visibility_handler(&source, VisibilityOptions::default());
    source.emit(PageVisibility::Hidden);
    h.clock.advance(5_000);
    source.emit(PageVisibility::Visible);

    assert!(h.recorder.is_empty());
    assert_eq!(*seen.lock(), vec![(None, 5_000)]);
}

#[test]
fn panicking_callback_does_not_stop_the_others() {
    let h = harness(BuildMode::Development);
    let calls = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&calls);
    h.cache
        .on_visibility_change("first", move |_, _| first.lock().push("first"));
    h.cache
        .on_visibility_change("broken", |_, _| panic!("page unmounted"));
    let third = Arc::clone(&calls);
    h.cache
        .on_visibility_change("third", move |_, _| third.lock().push("third"));

    let source = ManualVisibility::new();
    h.cache.init_visibility_handler(&source, VisibilityOptions::default());
    source.emit(PageVisibility::Hidden);
    h.clock.advance(40_000);
    source.emit(PageVisibility::Visible);

    assert_eq!(*calls.lock(), vec!["first", "third"]);
}

#[test]
fn restrict_user_resolves_through_the_security_table() {
    let h = harness(BuildMode::Development);
    let action: Action = "admin:restrict_user".parse().unwrap();
    assert!(matches!(action, Action::Security(_)));

    let reported = h.cache.invalidation_patterns("admin:restrict_user").unwrap();
    assert_eq!(h.cache.invalidate_for("admin:restrict_user"), Ok(true));
    assert_eq!(patterns(h.recorder.take()), reported);
}

#[test]
fn re_registering_an_id_replaces_the_callback() {
    let h = harness(BuildMode::Development);
    let hits = Arc::new(Mutex::new(Vec::new()));

    let old = Arc::clone(&hits);
    h.cache.on_visibility_change("X", move |_, _| old.lock().push("old"));
    let new = Arc::clone(&hits);
    let registration = h
        .cache
        .on_visibility_change("X", move |_, _| new.lock().push("new"));

    assert_eq!(h.cache.cache_state().registered_callbacks, 1);

    h.cache.trigger_staleness(StalenessTier::Critical);
    assert_eq!(*hits.lock(), vec!["new"]);

    assert!(registration.unregister());
    assert_eq!(h.cache.cache_state().registered_callbacks, 0);
}

#[test]
fn login_and_logout_clear_everything() {
    let h = harness(BuildMode::Development);
    for action in ["auth:login", "auth:logout"] {
        h.cache.invalidate_for(action).unwrap();
        assert_eq!(h.recorder.take(), vec![ClearCall::All]);
        assert_eq!(
            h.cache.invalidation_patterns(action),
            Some(vec![FULL_CLEAR_SENTINEL])
        );
    }
}

#[test]
fn audit_tail_survives_into_a_new_registry() {
    let session: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());

    let first = CacheBust::builder()
        .store(Arc::new(ClearRecorder::new()))
        .session_store(session.clone())
        .build()
        .unwrap();
    for _ in 0..30 {
        first.invalidate_for("dojo:claim").unwrap();
    }

    let second = CacheBust::builder()
        .store(Arc::new(ClearRecorder::new()))
        .session_store(session)
        .restore_audit_on_start(true)
        .build()
        .unwrap();
    let stats = second.audit_log().stats;
    assert_eq!(stats.total_events, 20);
    assert_eq!(stats.restored_count, 20);
}

#[test]
fn debug_namespace_installs_and_removes_handle() {
    let h = harness(BuildMode::Development);
    assert!(!disable_cache_debugging());

    for _ in 0..3 {
        h.cache.invalidate_for("gacha:roll").unwrap();
    }

    let handle = h.cache.enable_debugging();
    assert!(cachebust::registry::debug_handle().is_some());

    // this registry's own persisted tail is not reloaded as history
    let stats = handle.audit_log().stats;
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.restored_count, 0);
    assert_eq!(stats.by_action["gacha:roll"], 3);
    assert_eq!(handle.pattern_table().len(), h.cache.action_types().len());

    assert!(disable_cache_debugging());
    assert!(cachebust::registry::debug_handle().is_none());
}
