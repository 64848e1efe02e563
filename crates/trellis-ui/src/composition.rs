//! Owns a root composable together with the state it needs between frames.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use trellis_core::{with_frame, IdentityManager, PersistentState, RuntimeScheduler};
use trellis_ui_graphics::{CallOp, IntPoint};
use trellis_ui_layout::LayoutContext;
use web_time::Instant;

use crate::composer::Composer;
use crate::node::LayoutNode;
use crate::runtime::Runtime;

/// Block label of the implicit root every composition starts with.
pub const ROOT_KEY: &str = "root";

/// Viewport and density of the frames a composition is run in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConfig {
    pub viewport: IntPoint,
    pub px_per_dp: f32,
}

impl FrameConfig {
    pub fn new(viewport: IntPoint, px_per_dp: f32) -> Self {
        Self {
            viewport,
            px_per_dp,
        }
    }

    pub fn viewport(mut self, viewport: IntPoint) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn px_per_dp(mut self, px_per_dp: f32) -> Self {
        self.px_per_dp = px_per_dp;
        self
    }

    /// A fresh layout context for one frame.
    pub fn context(&self) -> LayoutContext {
        LayoutContext::new(self.viewport, self.px_per_dp)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new(IntPoint::new(800, 600), 1.0)
    }
}

type Content = Box<dyn Fn(&mut Composer<'_>)>;

/// A root composable, its persistent state and the runtime that draws it.
///
/// Every state change flags the composition for recomposition and pokes
/// the scheduler, if one is installed. Frames recompose only when flagged.
pub struct Composition {
    content: Content,
    state: PersistentState,
    ids: IdentityManager,
    runtime: Runtime,
    needs_recompose: Arc<AtomicBool>,
    scheduler: Option<Arc<dyn RuntimeScheduler>>,
    frame_requested: bool,
    root: Option<Rc<LayoutNode>>,
    compositions: u64,
}

impl Composition {
    pub fn new(content: impl Fn(&mut Composer<'_>) + 'static) -> Self {
        let mut composition = Self {
            content: Box::new(content),
            state: PersistentState::new(),
            ids: IdentityManager::new(),
            runtime: Runtime::new(),
            needs_recompose: Arc::new(AtomicBool::new(true)),
            scheduler: None,
            frame_requested: false,
            root: None,
            compositions: 0,
        };
        composition.install_change_hook();
        composition
    }

    /// Pokes `scheduler` whenever state changes or an animation asks for
    /// another frame.
    pub fn with_scheduler(mut self, scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self.install_change_hook();
        self
    }

    fn install_change_hook(&mut self) {
        let flag = Arc::clone(&self.needs_recompose);
        let scheduler = self.scheduler.clone();
        self.state.set_on_state_change(move || {
            flag.store(true, Ordering::SeqCst);
            if let Some(scheduler) = &scheduler {
                scheduler.schedule_frame();
            }
        });
    }

    /// True when state changed since the last composition.
    pub fn needs_recompose(&self) -> bool {
        self.needs_recompose.load(Ordering::SeqCst)
    }

    /// True when a recomposition is due or an animation is running.
    pub fn needs_frame(&self) -> bool {
        self.needs_recompose() || self.frame_requested
    }

    /// Forces the next frame to recompose.
    pub fn invalidate(&self) {
        self.needs_recompose.store(true, Ordering::SeqCst);
    }

    /// Runs one composition pass now.
    pub fn compose(&mut self) -> Rc<LayoutNode> {
        self.compose_at(Instant::now())
    }

    /// Runs one composition pass with `now` as the frame time.
    pub fn compose_at(&mut self, now: Instant) -> Rc<LayoutNode> {
        let content = &self.content;
        let ids = &mut self.ids;
        let (root, frame_requested) = with_frame(&mut self.state, |state| {
            let mut composer = Composer::new(state, ids).with_frame_time(now);
            composer.start_block(ROOT_KEY);
            content(&mut composer);
            composer.end_block();
            let requested = composer.frame_requested();
            (composer.build(), requested)
        });
        // Provider writes made while composing must not schedule another pass.
        self.needs_recompose.store(false, Ordering::SeqCst);
        self.frame_requested = frame_requested;
        if frame_requested {
            if let Some(scheduler) = &self.scheduler {
                scheduler.schedule_frame();
            }
        }
        self.compositions += 1;
        log::debug!(
            "composition {} produced {} nodes, {} state entries",
            self.compositions,
            root.subtree_len(),
            self.state.len()
        );
        self.root = Some(Rc::clone(&root));
        root
    }

    /// Composes if needed and runs a frame, returning the ops to draw.
    ///
    /// When pointer handlers change state during the frame, the tree is
    /// recomposed and laid out again before drawing, so the returned ops
    /// already reflect the input.
    pub fn frame(&mut self, gtx: &mut LayoutContext) -> CallOp {
        self.frame_at(gtx, Instant::now())
    }

    pub fn frame_at(&mut self, gtx: &mut LayoutContext, now: Instant) -> CallOp {
        let root = match &self.root {
            Some(root) if !self.needs_frame() => Rc::clone(root),
            _ => self.compose_at(now),
        };
        let call = self.runtime.run(gtx, &root);
        if !self.needs_recompose() {
            return call;
        }
        log::debug!("input changed state; recomposing before draw");
        let root = self.compose_at(now);
        self.runtime.run(gtx, &root)
    }

    /// Root of the last composition.
    pub fn root(&self) -> Option<&Rc<LayoutNode>> {
        self.root.as_ref()
    }

    pub fn state(&self) -> &PersistentState {
        &self.state
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Composition passes run so far.
    pub fn composition_count(&self) -> u64 {
        self.compositions
    }
}

#[cfg(test)]
#[path = "tests/composition_tests.rs"]
mod tests;
