use super::*;
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicUsize, Ordering};

fn frame<R>(store: &mut PersistentState, body: impl FnOnce(&mut PersistentState) -> R) -> R {
    with_frame(store, body)
}

#[test]
fn init_runs_once_while_accessed_every_frame() {
    let mut store = PersistentState::new();
    let inits = Cell::new(0);
    let init = || {
        inits.set(inits.get() + 1);
        0
    };

    let first = frame(&mut store, |s| s.must_state("count", init, StateOptions::default()));
    first.set(4);
    let second = frame(&mut store, |s| s.must_state("count", init, StateOptions::default()));

    assert_eq!(inits.get(), 1);
    assert_eq!(second.get(), 4);
    assert!(first.ptr_eq(&second));
}

#[test]
fn value_skipped_for_one_frame_is_recreated() {
    let mut store = PersistentState::new();
    let inits = Cell::new(0);
    let init = || {
        inits.set(inits.get() + 1);
        10
    };

    let old = frame(&mut store, |s| s.must_state("k", init, StateOptions::default()));
    old.set(11);
    frame(&mut store, |_| {});
    assert!(!store.contains_key("k"));
    let new = frame(&mut store, |s| s.must_state("k", init, StateOptions::default()));

    assert_eq!(inits.get(), 2);
    assert_eq!(new.get(), 10);
}

#[test]
fn type_mismatch_is_reported() {
    let mut store = PersistentState::new();
    store.start_frame();
    store
        .state("s", || 7_i32, StateOptions::default())
        .unwrap();
    let err = store
        .state("s", || "hi".to_string(), StateOptions::default())
        .unwrap_err();
    store.end_frame();

    match err {
        StateError::TypeMismatch { key, found, .. } => {
            assert_eq!(key, "s");
            assert_eq!(found, "i32");
        }
    }
}

#[test]
#[should_panic(expected = "type mismatch")]
fn must_state_panics_on_type_mismatch() {
    let mut store = PersistentState::new();
    store.start_frame();
    store.must_state("s", || 1_u8, StateOptions::default());
    store.must_state("s", || 1_u16, StateOptions::default());
}

#[test]
#[should_panic(expected = "start_frame called twice")]
fn double_start_frame_panics() {
    let mut store = PersistentState::new();
    store.start_frame();
    store.start_frame();
}

#[test]
#[should_panic(expected = "without start_frame")]
fn end_frame_without_start_panics() {
    PersistentState::new().end_frame();
}

#[test]
#[should_panic(expected = "outside a frame")]
fn state_outside_frame_panics() {
    let mut store = PersistentState::new();
    let _ = store.state("k", || 0, StateOptions::default());
}

#[test]
fn with_frame_closes_frame_on_unwind() {
    let mut store = PersistentState::new();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        with_frame(&mut store, |_| panic!("boom"));
    }));
    assert!(result.is_err());
    assert!(!store.in_frame());
    assert_eq!(store.frame_count(), 1);
}

#[test]
fn state_change_callback_fires_on_effective_writes() {
    let mut store = PersistentState::new();
    let value = frame(&mut store, |s| s.must_state("v", || 1, StateOptions::default()));
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    store.set_on_state_change(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    value.set(1);
    value.set(2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn custom_compare_suppresses_notifications() {
    let mut store = PersistentState::new();
    let value = frame(&mut store, |s| {
        s.must_state(
            "case-insensitive",
            || "Hello".to_string(),
            StateOptions::with_compare(|a: &String, b: &String| a.eq_ignore_ascii_case(b)),
        )
    });
    assert!(!value.set("HELLO".to_string()));
    assert_eq!(value.get(), "Hello");
}

type Log = Rc<RefCell<Vec<&'static str>>>;

#[derive(Clone)]
struct Tracked {
    log: Arc<std::sync::Mutex<Vec<&'static str>>>,
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.log, &other.log)
    }
}

impl RememberObserver for Tracked {
    fn on_remembered(&self) {
        self.log.lock().unwrap().push("remembered");
    }

    fn on_forgotten(&self) {
        self.log.lock().unwrap().push("forgotten");
    }
}

#[test]
fn remembered_state_hooks_follow_frames() {
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut store = PersistentState::new();
    let tracked = Tracked {
        log: Arc::clone(&log),
    };

    frame(&mut store, |s| {
        s.remembered_state("t", || tracked.clone(), StateOptions::default())
            .unwrap();
    });
    frame(&mut store, |s| {
        s.remembered_state("t", || tracked.clone(), StateOptions::default())
            .unwrap();
    });
    assert_eq!(*log.lock().unwrap(), vec!["remembered"]);

    frame(&mut store, |_| {});
    assert_eq!(*log.lock().unwrap(), vec!["remembered", "forgotten"]);
}

struct Model {
    log: Log,
    scope: RefCell<Option<CancellationScope>>,
}

impl RememberObserver for Model {
    fn on_remembered(&self) {
        self.log.borrow_mut().push("remembered");
    }

    fn on_forgotten(&self) {
        let cancelled = self
            .scope
            .borrow()
            .as_ref()
            .is_some_and(CancellationScope::is_cancelled);
        self.log
            .borrow_mut()
            .push(if cancelled { "forgotten(cancelled)" } else { "forgotten" });
    }
}

impl ViewModel for Model {
    fn set_view_model_scope(&self, scope: CancellationScope) {
        self.log.borrow_mut().push("scope");
        *self.scope.borrow_mut() = Some(scope);
    }

    fn on_cleared(&self) {
        self.log.borrow_mut().push("cleared");
    }
}

#[test]
fn gc_lifecycle_runs_cancel_forgotten_cleared_in_order() {
    let log: Log = Rc::default();
    let mut store = PersistentState::new();
    let make = || Model {
        log: Rc::clone(&log),
        scope: RefCell::new(None),
    };

    frame(&mut store, |s| {
        s.view_model("vm", make).unwrap();
    });
    assert_eq!(*log.borrow(), vec!["scope", "remembered"]);

    store.start_frame();
    store.end_frame();
    assert_eq!(
        *log.borrow(),
        vec!["scope", "remembered", "forgotten(cancelled)", "cleared"]
    );
    assert!(!store.contains_key("vm"));

    frame(&mut store, |_| {});
    assert_eq!(log.borrow().len(), 4);
}

#[test]
fn retained_objects_share_the_framed_lifetime() {
    let mut store = PersistentState::new();
    let first = frame(&mut store, |s| s.retain("cell", || Cell::new(1)).unwrap());
    first.set(2);
    let second = frame(&mut store, |s| s.retain("cell", || Cell::new(1)).unwrap());
    assert!(Rc::ptr_eq(&first, &second));
    frame(&mut store, |_| {});
    frame(&mut store, |_| {});
    assert!(store.is_empty());
}

#[test]
fn retained_and_reactive_entries_do_not_alias() {
    let mut store = PersistentState::new();
    store.start_frame();
    store.retain("x", || 1_i32).unwrap();
    let err = store.state("x", || 1_i32, StateOptions::default());
    store.end_frame();
    assert!(err.is_err());
}
