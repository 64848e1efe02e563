use trellis_ui::prelude::*;
use trellis_ui::AnimationSpec;

use super::*;

fn counter(c: &mut Composer<'_>) {
    let count = c.must_state("count", || 0u32);
    let label = count.get().to_string();
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
}

#[test]
fn click_text_drives_a_counter() {
    let mut harness = TestHarness::new(counter);
    harness.frame();
    assert_eq!(harness.texts(), vec!["0"]);

    harness.click_text("0").unwrap();
    assert_eq!(harness.texts(), vec!["1"]);
    harness.click_text("1").unwrap();
    assert_eq!(harness.texts(), vec!["2"]);
}

#[test]
fn queries_before_the_first_frame() {
    let harness = TestHarness::new(counter);
    assert_eq!(harness.find_text("0"), Err(HarnessError::NoFrame));
    assert!(harness.texts().is_empty());
    assert!(harness.tree_dump().is_empty());
    assert!(harness.last_frame().is_none());
}

#[test]
fn missing_text_is_reported() {
    let mut harness = TestHarness::new(counter);
    harness.frame();
    let err = harness.click_text("42").unwrap_err();
    assert_eq!(err, HarnessError::TextNotFound("42".to_owned()));
    assert_eq!(err.to_string(), "text \"42\" was not drawn in the last frame");
}

#[test]
fn dumps_describe_the_last_frame() {
    let mut harness = TestHarness::new(counter);
    harness.frame();
    let tree = harness.tree_dump();
    assert!(tree.starts_with("root#"), "{tree}");
    assert!(tree.contains("Button#"), "{tree}");
    assert!(harness.ops_dump().contains("\"0\""));
}

#[test]
fn virtual_time_settles_animations() {
    let mut harness = TestHarness::with_config(
        FrameConfig::default().viewport(IntPoint::new(200, 100)),
        |c| {
            let shown = c.must_state("shown", || true);
            let toggle = shown.clone();
            Column(c, Modifier::empty(), ColumnSpec::new(), |c| {
                Button(
                    c,
                    Modifier::empty(),
                    move || {
                        toggle.update(|v| !v);
                    },
                    |c| {
                        Label(c, "toggle");
                    },
                );
                AnimatedVisibility(
                    c,
                    shown.get(),
                    AnimationSpec::linear(100),
                    Modifier::empty(),
                    |c| {
                        Label(c, "details");
                    },
                );
            });
        },
    );
    harness.frame();
    assert_eq!(harness.texts(), vec!["toggle", "details"]);

    harness.click_text("toggle").unwrap();
    assert!(harness.composition().needs_frame());
    assert_eq!(harness.texts(), vec!["toggle", "details"]);

    let frames = harness.settle(Duration::from_millis(16));
    assert!((6..=8).contains(&frames), "took {frames} frames");
    assert_eq!(harness.texts(), vec!["toggle"]);
    assert!(!harness.composition().needs_frame());
}
