// Unit tests for the session arbiter on its own, without sessions

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use voice_session::{DispatchFn, SessionArbiter, SessionId, VoiceEvent};

fn collector(log: &Arc<Mutex<Vec<(SessionId, VoiceEvent)>>>, id: SessionId) -> DispatchFn {
    let log = Arc::clone(log);
    Arc::new(move |event: VoiceEvent| log.lock().unwrap().push((id, event)))
}

#[test]
fn test_new_arbiter_is_free() {
    let arbiter = SessionArbiter::new();
    let id = SessionId::new();

    assert_eq!(arbiter.current_owner(), None);
    assert!(arbiter.is_owner_or_free(id));
    assert!(!arbiter.is_owner(id));
}

#[test]
fn test_claim_and_release() {
    let arbiter = SessionArbiter::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = SessionId::new();
    let b = SessionId::new();

    arbiter.claim(a, collector(&log, a));
    assert_eq!(arbiter.current_owner(), Some(a));
    assert!(arbiter.is_owner_or_free(a));
    assert!(!arbiter.is_owner_or_free(b));

    arbiter.release();
    assert_eq!(arbiter.current_owner(), None);
    assert!(arbiter.is_owner_or_free(b));
}

#[test]
fn test_claim_replaces_previous_owner() {
    let arbiter = SessionArbiter::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = SessionId::new();
    let b = SessionId::new();

    arbiter.claim(a, collector(&log, a));
    arbiter.claim(b, collector(&log, b));
    arbiter.route_event(VoiceEvent::Start);

    assert_eq!(arbiter.current_owner(), Some(b));
    assert_eq!(*log.lock().unwrap(), vec![(b, VoiceEvent::Start)]);
}

#[test]
fn test_route_without_owner_is_dropped() {
    let arbiter = SessionArbiter::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = SessionId::new();

    arbiter.claim(a, collector(&log, a));
    arbiter.release();
    arbiter.route_event(VoiceEvent::End);

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_release_if_owner_only_releases_owner() {
    let arbiter = SessionArbiter::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = SessionId::new();
    let b = SessionId::new();

    arbiter.claim(a, collector(&log, a));
    assert!(!arbiter.release_if_owner(b));
    assert_eq!(arbiter.current_owner(), Some(a));

    assert!(arbiter.release_if_owner(a));
    assert_eq!(arbiter.current_owner(), None);
}

#[test]
fn test_dispatch_may_release_ownership() {
    let arbiter = Arc::new(SessionArbiter::new());
    let a = SessionId::new();

    let inner = Arc::clone(&arbiter);
    arbiter.claim(a, Arc::new(move |_event: VoiceEvent| inner.release()));
    arbiter.route_event(VoiceEvent::Start);

    assert_eq!(arbiter.current_owner(), None);
}

#[test]
fn test_try_claim_refuses_other_owner() {
    let arbiter = SessionArbiter::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = SessionId::new();
    let b = SessionId::new();

    assert!(arbiter.try_claim(a, collector(&log, a)));
    assert!(!arbiter.try_claim(b, collector(&log, b)));
    assert_eq!(arbiter.current_owner(), Some(a));

    // Events still go to the original owner
    arbiter.route_event(VoiceEvent::Start);
    assert_eq!(*log.lock().unwrap(), vec![(a, VoiceEvent::Start)]);
}

#[test]
fn test_try_claim_by_owner_replaces_dispatch() {
    let arbiter = SessionArbiter::new();
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));
    let a = SessionId::new();

    assert!(arbiter.try_claim(a, collector(&first, a)));
    assert!(arbiter.try_claim(a, collector(&second, a)));
    arbiter.route_event(VoiceEvent::End);

    assert!(first.lock().unwrap().is_empty());
    assert_eq!(*second.lock().unwrap(), vec![(a, VoiceEvent::End)]);
}

#[test]
fn test_stale_dispatch_cannot_release_new_owner() {
    let arbiter = Arc::new(SessionArbiter::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = SessionId::new();
    let b = SessionId::new();

    // A's dispatch hands the recognizer to B, then tries to release as A
    let inner = Arc::clone(&arbiter);
    let handover = collector(&log, b);
    arbiter.claim(
        a,
        Arc::new(move |_event: VoiceEvent| {
            inner.release_if_owner(a);
            assert!(inner.try_claim(b, Arc::clone(&handover)));
            assert!(!inner.release_if_owner(a));
        }),
    );
    arbiter.route_event(VoiceEvent::Results { value: Vec::new() });

    assert_eq!(arbiter.current_owner(), Some(b));
}

#[test]
fn test_at_most_one_owner_under_concurrent_claims() {
    let arbiter = Arc::new(SessionArbiter::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    let holders = Arc::new(AtomicUsize::new(0));
    let acquired = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let id = SessionId::new();
            let arbiter = Arc::clone(&arbiter);
            let dispatch = collector(&log, id);
            let holders = Arc::clone(&holders);
            let acquired = Arc::clone(&acquired);
            std::thread::spawn(move || {
                for _ in 0..500 {
                    if arbiter.try_claim(id, Arc::clone(&dispatch)) {
                        // Nobody else may hold the slot while we do
                        assert_eq!(holders.fetch_add(1, Ordering::SeqCst), 0);
                        assert_eq!(arbiter.current_owner(), Some(id));
                        acquired.fetch_add(1, Ordering::SeqCst);
                        holders.fetch_sub(1, Ordering::SeqCst);
                        assert!(arbiter.release_if_owner(id));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(acquired.load(Ordering::SeqCst) > 0);
    assert_eq!(arbiter.current_owner(), None);
}
