//! Headless frames with simulated pointer input.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use trellis_ui::{format_layout_tree, format_ops, Composer, Composition, FrameConfig};
use trellis_ui_graphics::{CallOp, FlatOp, IntRect, Point};
use trellis_ui_layout::{LayoutContext, PointerQueue};
use web_time::Instant;

/// Frames a harness runs while settling before it gives up.
const MAX_SETTLE_FRAMES: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HarnessError {
    /// No frame has been drawn yet.
    NoFrame,
    /// The text was not in the last frame.
    TextNotFound(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::NoFrame => write!(f, "no frame has been drawn"),
            HarnessError::TextNotFound(text) => {
                write!(f, "text {text:?} was not drawn in the last frame")
            }
        }
    }
}

impl std::error::Error for HarnessError {}

/// Headless harness for exercising compositions in tests.
///
/// Owns a [`Composition`], a pointer queue and a virtual clock that only
/// moves when told to, so animations are deterministic. Every input
/// helper runs a frame, and the ops it drew are kept for queries.
pub struct TestHarness {
    composition: Composition,
    config: FrameConfig,
    queue: Rc<PointerQueue>,
    start: Instant,
    elapsed: Duration,
    last_frame: Option<CallOp>,
}

impl TestHarness {
    pub fn new(content: impl Fn(&mut Composer<'_>) + 'static) -> Self {
        Self::with_config(FrameConfig::default(), content)
    }

    pub fn with_config(
        config: FrameConfig,
        content: impl Fn(&mut Composer<'_>) + 'static,
    ) -> Self {
        Self {
            composition: Composition::new(content),
            config,
            queue: Rc::new(PointerQueue::new()),
            start: Instant::now(),
            elapsed: Duration::ZERO,
            last_frame: None,
        }
    }

    fn context(&self) -> LayoutContext {
        self.config.context().with_input(self.queue.clone())
    }

    /// Current virtual time.
    pub fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    /// Runs one frame at the current virtual time.
    pub fn frame(&mut self) -> &CallOp {
        let mut gtx = self.context();
        let call = self.composition.frame_at(&mut gtx, self.now());
        self.last_frame.insert(call)
    }

    /// Moves the virtual clock by `by` and runs a frame.
    pub fn advance(&mut self, by: Duration) -> &CallOp {
        self.elapsed += by;
        self.frame()
    }

    /// Runs frames `step` apart until no animation asks for another.
    ///
    /// # Panics
    /// Panics when the composition is still busy after a hundred frames.
    pub fn settle(&mut self, step: Duration) -> usize {
        let mut frames = 0;
        while self.composition.needs_frame() {
            frames += 1;
            assert!(
                frames <= MAX_SETTLE_FRAMES,
                "composition still requests frames after {MAX_SETTLE_FRAMES} frames"
            );
            self.advance(step);
        }
        log::debug!("settled after {frames} frames");
        frames
    }

    /// Clicks at `position` and runs the frame that handles it.
    pub fn click_at(&mut self, position: Point) -> &CallOp {
        self.queue.click(position);
        self.frame()
    }

    /// Bounds of `text` in the last frame.
    pub fn find_text(&self, text: &str) -> Result<IntRect, HarnessError> {
        let last = self.last_frame.as_ref().ok_or(HarnessError::NoFrame)?;
        last.flatten()
            .into_iter()
            .find_map(|op| match op {
                FlatOp::Text { rect, text: drawn, .. } if drawn == text => Some(rect),
                _ => None,
            })
            .ok_or_else(|| HarnessError::TextNotFound(text.to_owned()))
    }

    /// Clicks the center of `text` as drawn in the last frame.
    pub fn click_text(&mut self, text: &str) -> Result<&CallOp, HarnessError> {
        let rect = self.find_text(text)?;
        Ok(self.click_at(rect.center()))
    }

    /// Texts of the last frame, in paint order.
    pub fn texts(&self) -> Vec<String> {
        self.last_frame
            .as_ref()
            .map(trellis_ui::drawn_texts)
            .unwrap_or_default()
    }

    pub fn last_frame(&self) -> Option<&CallOp> {
        self.last_frame.as_ref()
    }

    /// Outline of the composed tree, empty before the first frame.
    pub fn tree_dump(&self) -> String {
        self.composition
            .root()
            .map(|root| format_layout_tree(root))
            .unwrap_or_default()
    }

    pub fn ops_dump(&self) -> String {
        self.last_frame.as_ref().map(format_ops).unwrap_or_default()
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn composition_mut(&mut self) -> &mut Composition {
        &mut self.composition
    }

    pub fn queue(&self) -> &PointerQueue {
        &self.queue
    }
}

impl fmt::Debug for TestHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestHarness")
            .field("config", &self.config)
            .field("elapsed", &self.elapsed)
            .field("compositions", &self.composition.composition_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/harness_tests.rs"]
mod tests;
