//! Frame driver: layout, pointer and draw over a composed tree.
//!
//! [`Runtime::run`] performs a whole frame. Harnesses that need to inject
//! input between layout and pointer handling use the staged API:
//!
//! ```rust,ignore
//! let mut frame = runtime.begin(&mut gtx, &root);
//! frame.layout(&mut gtx);
//! frame.route_input(&gtx);
//! frame.pointer(&mut gtx);
//! let call = frame.draw(&mut gtx);
//! frame.finish(&gtx);
//! ```

use std::rc::Rc;

use trellis_core::NodePath;
use trellis_ui_graphics::{CallOp, IntPoint};
use trellis_ui_layout::{Dimensions, LayoutContext};

use crate::coordinator::{ChainStore, NodeCoordinator};
use crate::node::LayoutNode;

/// Runs frames and retains reconciled modifier nodes between them.
#[derive(Debug, Default)]
pub struct Runtime {
    chains: Rc<ChainStore>,
    frames: u64,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modifier node chains retained by node path.
    pub fn chains(&self) -> &ChainStore {
        &self.chains
    }

    /// Frames finished so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Starts a frame over `root`: clears its layout caches and drops the
    /// minimum constraints so the root may be smaller than the viewport.
    pub fn begin(&mut self, gtx: &mut LayoutContext, root: &Rc<LayoutNode>) -> Frame<'_> {
        root.clear_layout_results();
        gtx.constraints.min = IntPoint::ZERO;
        log::debug!(
            "frame {} begins: {} nodes, max {:?}",
            self.frames,
            root.subtree_len(),
            gtx.constraints.max
        );
        Frame {
            root: NodeCoordinator::new(Rc::clone(root), NodePath::root(), Rc::clone(&self.chains)),
            runtime: self,
            layout_ops: None,
        }
    }

    /// Runs a whole frame and returns the ops to draw.
    pub fn run(&mut self, gtx: &mut LayoutContext, root: &Rc<LayoutNode>) -> CallOp {
        let mut frame = self.begin(gtx, root);
        frame.layout(gtx);
        frame.route_input(gtx);
        frame.pointer(gtx);
        let call = frame.draw(gtx);
        frame.finish(gtx);
        call
    }
}

/// One frame in progress. Phases run in order: layout, pointer, draw.
pub struct Frame<'r> {
    runtime: &'r mut Runtime,
    root: NodeCoordinator,
    layout_ops: Option<CallOp>,
}

impl Frame<'_> {
    pub fn root(&self) -> &NodeCoordinator {
        &self.root
    }

    /// Lays the tree out, keeping the recording for input routing.
    pub fn layout(&mut self, gtx: &mut LayoutContext) -> Dimensions {
        let (dimensions, call) = gtx.record(|gtx| self.root.layout(gtx));
        log::trace!("layout produced {} ops, size {:?}", call.ops().len(), dimensions.size);
        self.layout_ops = Some(call);
        dimensions
    }

    /// Ops recorded by [`layout`](Self::layout), if it ran.
    pub fn layout_ops(&self) -> Option<&CallOp> {
        self.layout_ops.as_ref()
    }

    /// Hands the layout recording to the input source for hit testing.
    pub fn route_input(&self, gtx: &LayoutContext) {
        match &self.layout_ops {
            Some(call) => gtx.input.route(call),
            None => log::warn!("route_input called before layout; input stays queued"),
        }
    }

    /// Runs pointer handlers; nothing is drawn.
    pub fn pointer(&mut self, gtx: &mut LayoutContext) {
        self.root.pointer_phase(gtx);
    }

    /// Records the ops to draw.
    pub fn draw(&mut self, gtx: &mut LayoutContext) -> CallOp {
        self.root.draw(gtx)
    }

    /// Ends the frame: unconsumed input is dropped and modifier chains of
    /// nodes that left the tree are released.
    pub fn finish(self, gtx: &LayoutContext) {
        gtx.input.end_frame();
        let swept = self.runtime.chains.sweep();
        log::debug!("frame {} done, {swept} chains released", self.runtime.frames);
        self.runtime.frames += 1;
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
