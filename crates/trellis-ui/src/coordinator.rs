//! Node coordinators: the per-frame wrapper that expands a layout node's
//! modifier into widget pipelines.
//!
//! Expansion happens lazily, once per coordinator. The node's widget (or the
//! default stack) is the base of three pipelines:
//!
//! * the layout chain, wrapped by layout, draw and pointer nodes, run while
//!   laying out and cached per node;
//! * the draw chain, wrapped by layout and draw nodes;
//! * the pointer chain, wrapped by layout and pointer nodes.
//!
//! Modifier nodes are wrapped tail to head, so the head of the modifier is
//! the outermost effect. Parent-data nodes publish their element under
//! their key instead of wrapping anything.
//!
//! Chain nodes are retained across frames in a [`ChainStore`] keyed by node
//! path, so element diffing keeps node state between frames.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;
use trellis_core::collections::map::{HashMap, HashSet};
use trellis_core::NodePath;
use trellis_foundation::{
    DynModifierElement, LayoutWidget, ModifierNodeChain, NodeCapabilities, SharedChainNode,
};
use trellis_ui_graphics::CallOp;
use trellis_ui_layout::{Constraints, Dimensions, FramePhase, LayoutContext};

use crate::node::{LayoutNode, LayoutResult, NodeScope};
use crate::widgets::stack::stack_widget;

/// Reconciled chains, retained across frames by node path.
#[derive(Default)]
pub struct ChainStore {
    chains: RefCell<HashMap<String, ModifierNodeChain>>,
    touched: RefCell<HashSet<String>>,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the chain under `key` against `elements`, attaches its
    /// nodes to `owner` and returns them tail to head.
    pub(crate) fn reconcile(
        &self,
        key: &str,
        elements: &[DynModifierElement],
        owner: &LayoutNode,
    ) -> SmallVec<[(DynModifierElement, SharedChainNode); 4]> {
        self.touched.borrow_mut().insert(key.to_owned());
        let mut chains = self.chains.borrow_mut();
        if elements.is_empty() {
            // An emptied modifier drops its chain, detaching the nodes.
            chains.remove(key);
            return SmallVec::new();
        }
        let chain = chains.entry(key.to_owned()).or_default();
        let update = chain.update_from_slice(elements);
        if update.created > 0 || update.removed > 0 {
            log::debug!("chain {key}: {update:?}");
        }
        let mut nodes = SmallVec::with_capacity(chain.len());
        let mut index = chain.len();
        while index > 0 {
            index -= 1;
            chain.attach(index, owner);
        }
        for (element, node) in chain.iter().rev() {
            nodes.push((element.clone(), Rc::clone(node)));
        }
        nodes
    }

    /// Drops chains not reconciled since the last sweep. Returns how many.
    pub fn sweep(&self) -> usize {
        let touched = std::mem::take(&mut *self.touched.borrow_mut());
        let mut chains = self.chains.borrow_mut();
        let before = chains.len();
        chains.retain(|key, _| touched.contains(key));
        let removed = before - chains.len();
        if removed > 0 {
            log::debug!("swept {removed} chains");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.chains.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.borrow().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.chains.borrow().contains_key(key)
    }
}

impl fmt::Debug for ChainStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainStore")
            .field("chains", &self.len())
            .finish()
    }
}

struct Expansion {
    layout: LayoutWidget,
    draw: LayoutWidget,
    pointer: LayoutWidget,
    parent_data: IndexMap<&'static str, DynModifierElement>,
    children: Vec<Rc<NodeCoordinator>>,
}

pub struct NodeCoordinator {
    node: Rc<LayoutNode>,
    path: NodePath,
    store: Rc<ChainStore>,
    expansion: OnceCell<Expansion>,
}

impl NodeCoordinator {
    /// Wraps `node`, whose ancestors are `path`.
    pub fn new(node: Rc<LayoutNode>, path: NodePath, store: Rc<ChainStore>) -> Self {
        Self {
            node,
            path,
            store,
            expansion: OnceCell::new(),
        }
    }

    pub fn node(&self) -> &Rc<LayoutNode> {
        &self.node
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Key of this node's retained chain.
    pub fn chain_key(&self) -> String {
        self.path.with(self.node.id()).qualified()
    }

    pub fn is_expanded(&self) -> bool {
        self.expansion.get().is_some()
    }

    fn expansion(&self) -> &Expansion {
        self.expansion.get_or_init(|| self.expand())
    }

    fn expand(&self) -> Expansion {
        let child_path = self.path.with(self.node.id());
        let children: Vec<Rc<NodeCoordinator>> = self
            .node
            .children()
            .iter()
            .map(|child| {
                Rc::new(NodeCoordinator::new(
                    Rc::clone(child),
                    child_path.clone(),
                    Rc::clone(&self.store),
                ))
            })
            .collect();

        let scope = NodeScope::new(Rc::clone(&self.node), children.clone());
        let base = self
            .node
            .widget(&scope)
            .unwrap_or_else(|| stack_widget(children.clone()));

        let elements = self.node.modifier().elements();
        let nodes = self
            .store
            .reconcile(&self.chain_key(), &elements, &self.node);

        let mut layout = Rc::clone(&base);
        let mut draw = Rc::clone(&base);
        let mut pointer = base;
        let mut parent_data = IndexMap::new();

        for (element, node) in &nodes {
            let declared = element.capabilities();
            let node = node.borrow();
            let exposed = node.capabilities();
            assert!(
                exposed.contains(declared),
                "modifier {} declares {declared:?} but its node exposes {exposed:?}",
                element.inspector_name(),
            );
            if declared.contains(NodeCapabilities::LAYOUT) {
                if let Some(wrap) = node.as_layout_wrap() {
                    layout = wrap.wrap_layout(layout);
                    draw = wrap.wrap_layout(draw);
                    pointer = wrap.wrap_layout(pointer);
                }
            }
            if declared.contains(NodeCapabilities::DRAW) {
                if let Some(wrap) = node.as_draw_wrap() {
                    layout = wrap.wrap_draw(layout);
                    draw = wrap.wrap_draw(draw);
                }
            }
            if declared.contains(NodeCapabilities::POINTER_INPUT) {
                if let Some(wrap) = node.as_pointer_wrap() {
                    layout = wrap.wrap_pointer(layout);
                    pointer = wrap.wrap_pointer(pointer);
                }
            }
            if declared.contains(NodeCapabilities::PARENT_DATA) {
                if let Some(data) = node.as_parent_data() {
                    parent_data.insert(data.parent_data_key(), element.clone());
                }
            }
        }

        log::trace!(
            "expanded {} {:?}: {} modifier nodes, {} children",
            self.node.key(),
            self.node.id(),
            nodes.len(),
            children.len(),
        );

        Expansion {
            layout,
            draw,
            pointer,
            parent_data,
            children,
        }
    }

    /// Child coordinators, expanding this one if needed.
    pub fn children(&self) -> &[Rc<NodeCoordinator>] {
        &self.expansion().children
    }

    /// Parent data published under `key`, if its element is an `E`.
    pub fn parent_data<E: Clone + 'static>(&self, key: &str) -> Option<E> {
        self.expansion()
            .parent_data
            .get(key)
            .and_then(|element| element.downcast_ref::<E>())
            .cloned()
    }

    pub fn parent_data_keys(&self) -> Vec<&'static str> {
        self.expansion().parent_data.keys().copied().collect()
    }

    fn cached(&self, constraints: Constraints) -> Option<LayoutResult> {
        self.node
            .layout_result()
            .filter(|result| result.constraints == constraints)
    }

    /// Runs this node as a child in the current phase of `gtx`.
    ///
    /// Layout reuses the cached result when the constraints are unchanged;
    /// otherwise the layout chain is recorded and cached.
    pub fn run(&self, gtx: &mut LayoutContext) -> Dimensions {
        let constraints = gtx.constraints;
        match gtx.phase {
            FramePhase::Layout => {
                if let Some(result) = self.cached(constraints) {
                    result.call.add(&mut gtx.ops);
                    return result.dimensions;
                }
                let layout = Rc::clone(&self.expansion().layout);
                let (dimensions, call) = gtx.record(|gtx| layout(gtx));
                self.node.set_layout_result(LayoutResult {
                    constraints,
                    dimensions,
                    call: call.clone(),
                });
                call.add(&mut gtx.ops);
                dimensions
            }
            FramePhase::Pointer => {
                let pointer = Rc::clone(&self.expansion().pointer);
                pointer(gtx)
            }
            FramePhase::Draw => {
                if let Some(result) = self.cached(constraints) {
                    result.call.add(&mut gtx.ops);
                    return result.dimensions;
                }
                let draw = Rc::clone(&self.expansion().draw);
                draw(gtx)
            }
        }
    }

    /// Runs this node under `constraints`, returning its dimensions and the
    /// recorded ops for the parent to place.
    pub fn measure(&self, gtx: &mut LayoutContext, constraints: Constraints) -> (Dimensions, CallOp) {
        gtx.record(|gtx| gtx.with_constraints(constraints, |gtx| self.run(gtx)))
    }

    /// Expands if needed, lays out and caches the result.
    pub fn layout(&self, gtx: &mut LayoutContext) -> Dimensions {
        gtx.in_phase(FramePhase::Layout, |gtx| self.run(gtx))
    }

    /// Runs the pointer chain; the recorded ops are discarded.
    pub fn pointer_phase(&self, gtx: &mut LayoutContext) {
        gtx.in_phase(FramePhase::Pointer, |gtx| {
            let pointer = Rc::clone(&self.expansion().pointer);
            let _ = gtx.record(|gtx| pointer(gtx));
        });
    }

    /// Records the frame's draw ops.
    pub fn draw(&self, gtx: &mut LayoutContext) -> CallOp {
        gtx.in_phase(FramePhase::Draw, |gtx| {
            let (_, call) = gtx.record(|gtx| self.run(gtx));
            call
        })
    }
}

impl fmt::Debug for NodeCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCoordinator")
            .field("key", &self.node.key())
            .field("id", &self.node.id())
            .field("path", &self.path)
            .field("expanded", &self.is_expanded())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
