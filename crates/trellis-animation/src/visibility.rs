//! Fade between hidden and shown.

use std::cell::Cell;

use web_time::Instant;

use crate::easing::{AnimationSpec, Lerp};

/// Progress of a show/hide transition, from 0 (hidden) to 1 (shown).
///
/// Retarget with [`set_visible`](Self::set_visible) at every frame; a
/// reversal mid-flight starts from the current progress rather than
/// jumping.
#[derive(Debug)]
pub struct VisibilityAnimation {
    spec: Cell<AnimationSpec>,
    visible: Cell<bool>,
    from: Cell<f32>,
    started: Cell<Option<Instant>>,
}

impl VisibilityAnimation {
    /// Starts settled at `visible`.
    pub fn new(visible: bool, spec: AnimationSpec) -> Self {
        Self {
            spec: Cell::new(spec),
            visible: Cell::new(visible),
            from: Cell::new(if visible { 1.0 } else { 0.0 }),
            started: Cell::new(None),
        }
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec.get()
    }

    pub fn set_spec(&self, spec: AnimationSpec) {
        self.spec.set(spec);
    }

    pub fn target_visible(&self) -> bool {
        self.visible.get()
    }

    fn target(&self) -> f32 {
        if self.visible.get() {
            1.0
        } else {
            0.0
        }
    }

    /// Retargets at `now`. Returns true when the target changed.
    pub fn set_visible(&self, visible: bool, now: Instant) -> bool {
        if visible == self.visible.get() {
            return false;
        }
        let current = self.progress(now);
        log::debug!("visibility animation {} from {current:.2}", if visible { "in" } else { "out" });
        self.from.set(current);
        self.visible.set(visible);
        self.started.set(Some(now));
        true
    }

    /// Progress at `now`, in `0..=1`.
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(started) = self.started.get() else {
            return self.target();
        };
        let elapsed = now.saturating_duration_since(started).as_millis() as u64;
        let fraction = self.spec.get().progress(elapsed);
        self.from.get().lerp(&self.target(), fraction)
    }

    /// True while the transition has not reached its target.
    pub fn is_running(&self, now: Instant) -> bool {
        match self.started.get() {
            Some(started) => {
                let elapsed = now.saturating_duration_since(started).as_millis() as u64;
                if elapsed >= self.spec.get().total_millis() {
                    self.from.set(self.target());
                    self.started.set(None);
                    false
                } else {
                    true
                }
            }
            None => false,
        }
    }

    /// True while anything is visible, including a fade-out in progress.
    pub fn is_shown(&self, now: Instant) -> bool {
        self.visible.get() || self.is_running(now)
    }
}

#[cfg(test)]
#[path = "tests/visibility_tests.rs"]
mod tests;
