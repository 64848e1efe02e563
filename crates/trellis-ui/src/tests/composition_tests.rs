use std::cell::RefCell;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use trellis_animation::AnimationSpec;
use trellis_core::MutableValue;
use trellis_ui_graphics::{FlatOp, Point};
use trellis_ui_layout::PointerQueue;

use super::*;
use crate::debug::drawn_texts;
use crate::modifier::Modifier;
use crate::widgets::{AnimatedVisibility, Button, Column, ColumnSpec, Label};

#[derive(Default)]
struct CountingScheduler {
    frames: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}

fn text_center(call: &CallOp, wanted: &str) -> Point {
    call.flatten()
        .into_iter()
        .find_map(|op| match op {
            FlatOp::Text { rect, text, .. } if text == wanted => Some(rect.center()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("{wanted:?} was not drawn"))
}

fn counter() -> Composition {
    Composition::new(|c| {
        let count = c.must_state("count", || 0u32);
        Column(c, Modifier::empty(), ColumnSpec::new(), |c| {
            let label = count.get().to_string();
            let clicked = count.clone();
            Button(c, Modifier::empty(), move || {
                clicked.update(|n| n + 1);
            }, |c| {
                Label(c, label);
            });
        });
    })
}

#[test]
fn frame_config_defaults_and_builders() {
    let config = FrameConfig::default();
    assert_eq!(config.viewport, IntPoint::new(800, 600));
    assert_eq!(config.px_per_dp, 1.0);

    let config = config.viewport(IntPoint::new(320, 240)).px_per_dp(2.0);
    assert_eq!(config, FrameConfig::new(IntPoint::new(320, 240), 2.0));
    let gtx = config.context();
    assert_eq!(gtx.constraints.max, IntPoint::new(320, 240));
    assert_eq!(gtx.px_per_dp, 2.0);
}

#[test]
fn compose_wraps_content_in_the_root_block() {
    let mut composition = Composition::new(|c| {
        Label(c, "only");
    });
    assert!(composition.needs_recompose());
    assert!(composition.root().is_none());

    let root = composition.compose();
    assert_eq!(root.key(), ROOT_KEY);
    assert_eq!(root.children().len(), 1);
    assert!(!composition.needs_recompose());
    assert_eq!(composition.composition_count(), 1);
}

#[test]
fn frames_recompose_only_when_flagged() {
    let mut composition = Composition::new(|c| {
        Label(c, "static");
    });
    let mut gtx = FrameConfig::default().context();

    composition.frame(&mut gtx);
    composition.frame(&mut gtx);
    assert_eq!(composition.composition_count(), 1);
    assert_eq!(composition.runtime().frame_count(), 2);

    composition.invalidate();
    assert!(composition.needs_frame());
    composition.frame(&mut gtx);
    assert_eq!(composition.composition_count(), 2);
}

#[test]
fn state_writes_flag_recomposition_and_poke_the_scheduler() {
    let scheduler = Arc::new(CountingScheduler::default());
    let handle: Rc<RefCell<Option<MutableValue<String>>>> = Rc::default();
    let exported = Rc::clone(&handle);
    let mut composition = Composition::new(move |c| {
        let greeting = c.must_state("greeting", || "hello".to_owned());
        Label(c, greeting.get());
        *exported.borrow_mut() = Some(greeting);
    })
    .with_scheduler(scheduler.clone());
    let mut gtx = FrameConfig::default().context();

    let call = composition.frame(&mut gtx);
    assert_eq!(drawn_texts(&call), vec!["hello".to_owned()]);
    assert!(!composition.needs_recompose());

    let greeting = handle.borrow().clone().unwrap_or_else(|| panic!("state not exported"));
    assert!(greeting.set("bye".to_owned()));
    assert!(composition.needs_recompose());
    assert_eq!(scheduler.frames.load(Ordering::SeqCst), 1);

    assert!(!greeting.set("bye".to_owned()), "equal writes are not changes");
    assert_eq!(scheduler.frames.load(Ordering::SeqCst), 1);

    let call = composition.frame(&mut gtx);
    assert_eq!(drawn_texts(&call), vec!["bye".to_owned()]);
    assert_eq!(composition.composition_count(), 2);
}

#[test]
fn clicks_are_reflected_in_the_same_frame() {
    let mut composition = counter();
    let queue = Rc::new(PointerQueue::new());
    let mut gtx = FrameConfig::default().context().with_input(queue.clone());

    let mut labels = Vec::new();
    let mut call = composition.frame(&mut gtx);
    labels.extend(drawn_texts(&call));
    for _ in 0..2 {
        let target = text_center(&call, labels.last().map_or("", String::as_str));
        queue.click(target);
        call = composition.frame(&mut gtx);
        labels.extend(drawn_texts(&call));
    }

    assert_eq!(labels, vec!["0", "1", "2"]);
    assert_eq!(composition.composition_count(), 3);
}

#[test]
fn running_animations_keep_requesting_frames() {
    let scheduler = Arc::new(CountingScheduler::default());
    let visible = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&visible);
    let mut composition = Composition::new(move |c| {
        AnimatedVisibility(
            c,
            flag.load(Ordering::SeqCst),
            AnimationSpec::linear(100),
            Modifier::empty(),
            |c| {
                Label(c, "fading");
            },
        );
    })
    .with_scheduler(scheduler.clone());
    let mut gtx = FrameConfig::default().context();
    let start = Instant::now();

    let call = composition.frame_at(&mut gtx, start);
    assert_eq!(drawn_texts(&call), vec!["fading".to_owned()]);
    assert!(!composition.needs_frame(), "starts settled");

    visible.store(false, Ordering::SeqCst);
    composition.invalidate();
    let call = composition.frame_at(&mut gtx, start + Duration::from_millis(10));
    assert_eq!(drawn_texts(&call), vec!["fading".to_owned()]);
    assert!(composition.needs_frame());
    assert!(scheduler.frames.load(Ordering::SeqCst) >= 1);

    let call = composition.frame_at(&mut gtx, start + Duration::from_millis(60));
    let alpha = call
        .flatten()
        .into_iter()
        .find_map(|op| match op {
            FlatOp::Text { color, .. } => Some(color.a()),
            _ => None,
        })
        .unwrap_or_default();
    assert!(alpha > 0.0 && alpha < 1.0, "mid-fade alpha was {alpha}");

    let call = composition.frame_at(&mut gtx, start + Duration::from_millis(200));
    assert!(drawn_texts(&call).is_empty());
    assert!(!composition.needs_frame());
}
