//! The context threaded through every widget call.

use std::rc::Rc;

use trellis_ui_graphics::{CallOp, Dp, IntPoint, Ops};

use crate::constraints::Constraints;
use crate::input::{InputSource, NoInput};

/// Result of laying out a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub size: IntPoint,
    /// Distance from the bottom edge to the text baseline; zero when none.
    pub baseline: i32,
}

impl Dimensions {
    pub fn new(size: IntPoint) -> Self {
        Self { size, baseline: 0 }
    }
}

/// Which pass of a frame is running a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FramePhase {
    #[default]
    Layout,
    /// Ops are recorded and discarded; pointer handlers consume input.
    Pointer,
    Draw,
}

pub struct LayoutContext {
    pub constraints: Constraints,
    pub px_per_dp: f32,
    pub ops: Ops,
    pub input: Rc<dyn InputSource>,
    pub phase: FramePhase,
}

impl LayoutContext {
    /// Context for a `viewport` sized window.
    pub fn new(viewport: IntPoint, px_per_dp: f32) -> Self {
        Self {
            constraints: Constraints::tight(viewport),
            px_per_dp,
            ops: Ops::new(),
            input: Rc::new(NoInput),
            phase: FramePhase::Layout,
        }
    }

    pub fn with_input(mut self, input: Rc<dyn InputSource>) -> Self {
        self.input = input;
        self
    }

    /// Converts `dp` to whole pixels.
    pub fn dp(&self, dp: Dp) -> i32 {
        dp.round_px(self.px_per_dp)
    }

    /// Runs `f` under `constraints`, restoring the previous ones afterwards.
    pub fn with_constraints<R>(
        &mut self,
        constraints: Constraints,
        f: impl FnOnce(&mut LayoutContext) -> R,
    ) -> R {
        let saved = std::mem::replace(&mut self.constraints, constraints);
        let result = f(self);
        self.constraints = saved;
        result
    }

    /// Runs `f` while recording its ops into a [`CallOp`].
    pub fn record<R>(&mut self, f: impl FnOnce(&mut LayoutContext) -> R) -> (R, CallOp) {
        let recording = self.ops.record();
        let result = f(self);
        let call = recording.stop(&mut self.ops);
        (result, call)
    }

    /// Runs `f` in `phase`, restoring the previous phase afterwards.
    pub fn in_phase<R>(&mut self, phase: FramePhase, f: impl FnOnce(&mut LayoutContext) -> R) -> R {
        let saved = std::mem::replace(&mut self.phase, phase);
        let result = f(self);
        self.phase = saved;
        result
    }
}

impl std::fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("constraints", &self.constraints)
            .field("px_per_dp", &self.px_per_dp)
            .field("phase", &self.phase)
            .field("ops", &self.ops.len())
            .finish()
    }
}
