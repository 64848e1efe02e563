use std::cell::RefCell as StdRefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trellis_core::{with_frame, PersistentState};

use super::*;

static LOCAL_SIZE: CompositionLocal<u32> = composition_local_of("test.size", || 10);
static LOCAL_NAME: StaticCompositionLocal<&'static str> =
    static_composition_local_of("test.name", || "default");

fn pass(
    state: &mut PersistentState,
    ids: &mut IdentityManager,
    body: impl FnOnce(&mut Composer<'_>),
) {
    with_frame(state, |state| {
        let mut composer = Composer::new(state, ids);
        composer.start_block("root");
        body(&mut composer);
        composer.end_block();
        composer.build();
    });
}

#[test]
fn current_falls_back_to_default() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        assert_eq!(LOCAL_SIZE.current(c), 10);
        assert_eq!(LOCAL_NAME.current(c), "default");
    });
}

#[test]
fn providers_nest_and_restore() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let seen = StdRefCell::new(Vec::new());
    pass(&mut state, &mut ids, |c| {
        composition_local_provider(c, vec![LOCAL_SIZE.provides(20)], |c| {
            seen.borrow_mut().push(LOCAL_SIZE.current(c));
            c.start_block("inner");
            composition_local_provider(c, vec![LOCAL_SIZE.provides(30)], |c| {
                seen.borrow_mut().push(LOCAL_SIZE.current(c));
            });
            c.end_block();
            seen.borrow_mut().push(LOCAL_SIZE.current(c));
        });
        seen.borrow_mut().push(LOCAL_SIZE.current(c));
    });
    assert_eq!(*seen.borrow(), vec![20, 30, 20, 10]);
}

fn nested_without_block(c: &mut Composer<'_>, seen: &StdRefCell<Vec<u32>>) {
    composition_local_provider(c, vec![LOCAL_SIZE.provides(20)], |c| {
        composition_local_provider(c, vec![LOCAL_SIZE.provides(30)], |c| {
            seen.borrow_mut().push(LOCAL_SIZE.current(c));
        });
        seen.borrow_mut().push(LOCAL_SIZE.current(c));
    });
}

#[test]
fn providers_nested_in_one_block_restore_the_outer_value() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let seen = StdRefCell::new(Vec::new());
    pass(&mut state, &mut ids, |c| nested_without_block(c, &seen));
    assert_eq!(*seen.borrow(), vec![30, 20]);
}

#[test]
fn steady_nested_providers_do_not_notify_the_store() {
    let mut state = PersistentState::new();
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    state.set_on_state_change(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut ids = IdentityManager::new();
    let seen = StdRefCell::new(Vec::new());
    for _ in 0..3 {
        pass(&mut state, &mut ids, |c| nested_without_block(c, &seen));
    }
    assert_eq!(*seen.borrow(), vec![30, 20, 30, 20, 30, 20]);
    assert_eq!(changes.load(Ordering::SeqCst), 0);
}

#[test]
fn sibling_static_providers_keep_separate_history() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let mut counts = Vec::new();
    for _ in 0..3 {
        with_frame(&mut state, |state| {
            let mut c = Composer::new(state, &mut ids);
            c.start_block("root");
            composition_local_provider(&mut c, vec![LOCAL_NAME.provides("outer")], |c| {
                composition_local_provider(c, vec![LOCAL_NAME.provides("inner")], |c| {
                    assert_eq!(LOCAL_NAME.current(c), "inner");
                });
                assert_eq!(LOCAL_NAME.current(c), "outer");
            });
            composition_local_provider(&mut c, vec![LOCAL_NAME.provides("next")], |c| {
                assert_eq!(LOCAL_NAME.current(c), "next");
            });
            c.end_block();
            counts.push(c.static_local_changes());
        });
    }
    assert_eq!(counts, vec![0, 0, 0]);
}

#[test]
fn several_locals_in_one_provider() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        composition_local_provider(
            c,
            vec![LOCAL_SIZE.provides(1), LOCAL_NAME.provides("named")],
            |c| {
                assert_eq!(LOCAL_SIZE.current(c), 1);
                assert_eq!(LOCAL_NAME.current(c), "named");
            },
        );
        assert_eq!(LOCAL_NAME.current(c), "default");
        assert!(c.locals.is_empty());
    });
}

#[test]
fn dynamic_change_notifies_the_store() {
    let mut state = PersistentState::new();
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    state.set_on_state_change(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut ids = IdentityManager::new();

    for value in [5, 5, 6] {
        pass(&mut state, &mut ids, |c| {
            composition_local_provider(c, vec![LOCAL_SIZE.provides(value)], |c| {
                assert_eq!(LOCAL_SIZE.current(c), value);
            });
        });
    }
    assert_eq!(changes.load(Ordering::SeqCst), 1);
}

#[test]
fn dynamic_reads_are_observed() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        composition_local_provider(c, vec![LOCAL_SIZE.provides(3)], |c| {
            let (value, reads) = trellis_core::observe_reads(|| LOCAL_SIZE.current(c));
            assert_eq!(value, 3);
            assert_eq!(reads.len(), 1);
        });
    });
}

#[test]
fn static_change_is_counted_per_provider_site() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let mut counts = Vec::new();
    for name in ["a", "a", "b"] {
        with_frame(&mut state, |state| {
            let mut c = Composer::new(state, &mut ids);
            c.start_block("root");
            composition_local_provider(&mut c, vec![LOCAL_NAME.provides(name)], |c| {
                assert_eq!(LOCAL_NAME.current(c), name);
            });
            c.end_block();
            counts.push(c.static_local_changes());
        });
    }
    assert_eq!(counts, vec![0, 0, 1]);
}

#[test]
fn local_keys_come_from_names() {
    assert_eq!(LOCAL_SIZE.key(), LOCAL_SIZE.key());
    assert_ne!(LOCAL_SIZE.key(), LOCAL_NAME.key());
    assert_eq!(LOCAL_SIZE.provides(1).name(), "test.size");
    assert_eq!(LOCAL_SIZE.default_value(), 10);
}
