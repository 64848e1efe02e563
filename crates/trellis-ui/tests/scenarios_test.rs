//! End-to-end scenarios: counter, branch isolation, zipper build and the
//! modifier partition.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use trellis_core::{with_frame, IdentityManager, PersistentState};
use trellis_runtime_std::StdRuntime;
use trellis_testing::TestHarness;
use trellis_ui::prelude::*;
use trellis_ui::{drawn_texts, IF_FALSE, IF_TRUE};
use trellis_ui_graphics::FlatOp;

fn counter(c: &mut Composer<'_>) {
    let inits = c.retain("inits", || Cell::new(0)).unwrap();
    let count = c.must_state("c", || {
        inits.set(inits.get() + 1);
        0u32
    });
    assert_eq!(inits.get(), 1, "state init runs once");
    let label = count.get().to_string();
    Column(c, Modifier::empty(), ColumnSpec::new(), |c| {
        Button(
            c,
            Modifier::empty(),
            move || {
                count.update(|n| n + 1);
            },
            |c| {
                Label(c, label);
            },
        );
    });
}

#[test]
fn counter_round_trip() {
    let mut harness = TestHarness::new(counter);
    let mut labels = Vec::new();

    harness.frame();
    labels.extend(harness.texts());
    for _ in 0..2 {
        let current = labels.last().cloned().unwrap_or_default();
        harness.click_text(&current).unwrap();
        labels.extend(harness.texts());
    }

    assert_eq!(labels, vec!["0", "1", "2"]);
}

#[test]
fn counter_clicks_wake_the_std_scheduler() {
    let runtime = StdRuntime::new();
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter_wakes = Arc::clone(&wakes);
    runtime.set_frame_waker(move || {
        counter_wakes.fetch_add(1, Ordering::SeqCst);
    });

    let mut composition = Composition::new(counter).with_scheduler(runtime.scheduler());
    let queue = Rc::new(PointerQueue::new());
    let mut gtx = FrameConfig::default().context().with_input(queue.clone());

    let call = composition.frame(&mut gtx);
    assert!(!runtime.take_frame_request());
    let target = call
        .flatten()
        .into_iter()
        .find_map(|op| match op {
            FlatOp::Text { rect, .. } => Some(rect.center()),
            _ => None,
        })
        .unwrap();

    queue.click(target);
    let call = composition.frame(&mut gtx);
    assert_eq!(drawn_texts(&call), vec!["1".to_owned()]);
    assert!(runtime.take_frame_request());
    assert_eq!(wakes.load(Ordering::SeqCst), 1);
}

#[test]
fn branch_isolation() {
    let condition = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&condition);
    let mut composition = Composition::new(move |c| {
        c.if_else(
            flag.load(Ordering::SeqCst),
            |c| {
                let s = c.must_state("s", || 7);
                Label(c, s.get().to_string());
            },
            |c| {
                let s = c.must_state("s", || String::from("hi"));
                Label(c, s.get());
            },
        );
    });
    let mut gtx = FrameConfig::default().context();

    let first = composition.frame(&mut gtx);
    assert_eq!(drawn_texts(&first), vec!["hi".to_owned()]);

    condition.store(true, Ordering::SeqCst);
    composition.invalidate();
    let second = composition.frame(&mut gtx);
    assert_eq!(drawn_texts(&second), vec!["7".to_owned()]);

    let keys = composition.state().keys();
    assert!(keys.iter().all(|key| !key.contains(IF_FALSE)), "{keys:?}");
    assert!(keys.iter().any(|key| key.contains(IF_TRUE)), "{keys:?}");
}

#[test]
fn zipper_build() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let root = with_frame(&mut state, |state| {
        let mut c = Composer::new(state, &mut ids);
        c.start_block("A");
        c.start_block("B");
        c.end_block();
        c.start_block("C");
        c.end_block();
        c.end_block();
        c.build()
    });

    assert_eq!(root.key(), "A");
    let children: Vec<&str> = root.children().iter().map(|child| child.key()).collect();
    assert_eq!(children, vec!["B", "C"]);

    let a = root.id();
    let b = root.children()[0].id();
    let c = root.children()[1].id();
    assert!(a.value() < b.value() && b.value() < c.value());
    assert_eq!(a.scope_hash(), b.scope_hash());
}

#[test]
fn modifier_partition_end_to_end() {
    let clicks = Rc::new(Cell::new(0));
    let counted = Rc::clone(&clicks);
    let mut harness = TestHarness::new(move |c| {
        let counted = Rc::clone(&counted);
        let user_outer = Modifier::empty().padding(10.0);
        let m = user_outer
            .clickable(move |_: Point| counted.set(counted.get() + 1))
            .size(60.0, 30.0);
        let (outer, inner) = m.partition("clickable");
        assert_eq!(
            inner.inspector_entries().iter().map(|info| info.name()).collect::<Vec<_>>(),
            vec!["clickable"]
        );
        assert_eq!(
            outer.inspector_entries().iter().map(|info| info.name()).collect::<Vec<_>>(),
            vec!["padding", "size"]
        );
        Spacer(c, outer.then(inner));
    });
    harness.frame();

    harness.click_at(Point::new(5.0, 5.0));
    assert_eq!(clicks.get(), 0, "padding is outside the click area");
    harness.click_at(Point::new(30.0, 20.0));
    assert_eq!(clicks.get(), 1);
    harness.click_at(Point::new(75.0, 20.0));
    assert_eq!(clicks.get(), 1, "size box ends at x = 70");
}
