//! Layout nodes produced by the composer.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use trellis_core::{Identifier, ImmutableMap};
use trellis_foundation::{LayoutWidget, TreeNode};
use trellis_ui_graphics::CallOp;
use trellis_ui_layout::{Constraints, Dimensions};

use crate::coordinator::NodeCoordinator;
use crate::modifier::Modifier;

/// Builds a node's widget once the node is final.
///
/// Constructors are registered while the block is still open, before its
/// children and slots exist, so they read both from the [`NodeScope`].
pub type WidgetConstructor = Rc<dyn Fn(&NodeScope) -> LayoutWidget>;

/// The finished node and its child coordinators, as seen by a widget constructor.
pub struct NodeScope {
    node: Rc<LayoutNode>,
    children: Vec<Rc<NodeCoordinator>>,
}

impl NodeScope {
    pub(crate) fn new(node: Rc<LayoutNode>, children: Vec<Rc<NodeCoordinator>>) -> Self {
        Self { node, children }
    }

    pub fn node(&self) -> &Rc<LayoutNode> {
        &self.node
    }

    pub fn children(&self) -> &[Rc<NodeCoordinator>] {
        &self.children
    }

    pub fn slot<T: 'static>(&self, key: &str) -> Option<&T> {
        self.node.slot(key)
    }
}

/// Cached outcome of laying a node out under `constraints`.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    pub constraints: Constraints,
    pub dimensions: Dimensions,
    pub call: CallOp,
}

/// A block of UI: children, modifier, slots and an optional widget.
#[derive(Clone)]
pub struct LayoutNode {
    id: Identifier,
    key: String,
    children: Vec<Rc<LayoutNode>>,
    modifier: Modifier,
    slots: ImmutableMap<Rc<dyn Any>>,
    widget_constructor: Option<WidgetConstructor>,
    layout_result: RefCell<Option<LayoutResult>>,
}

impl LayoutNode {
    pub fn new(id: Identifier, key: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            children: Vec::new(),
            modifier: Modifier::empty(),
            slots: ImmutableMap::new(),
            widget_constructor: None,
            layout_result: RefCell::new(None),
        }
    }

    pub fn id(&self) -> Identifier {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn children(&self) -> &[Rc<LayoutNode>] {
        &self.children
    }

    pub(crate) fn take_children(&mut self) -> Vec<Rc<LayoutNode>> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn set_children(&mut self, children: Vec<Rc<LayoutNode>>) {
        self.children = children;
    }

    pub fn push_child(&mut self, child: impl Into<Rc<LayoutNode>>) {
        self.children.push(child.into());
    }

    pub fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    /// Replaces the modifier with `transform(current)`.
    pub fn map_modifier(&mut self, transform: impl FnOnce(Modifier) -> Modifier) {
        let current = std::mem::take(&mut self.modifier);
        self.modifier = transform(current);
    }

    pub fn set_slot<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.slots = self.slots.assoc(key, Rc::new(value) as Rc<dyn Any>);
    }

    pub fn slot<T: 'static>(&self, key: &str) -> Option<&T> {
        self.slots.find(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn slots(&self) -> &ImmutableMap<Rc<dyn Any>> {
        &self.slots
    }

    pub fn set_widget_constructor(&mut self, constructor: WidgetConstructor) {
        self.widget_constructor = Some(constructor);
    }

    pub fn has_widget(&self) -> bool {
        self.widget_constructor.is_some()
    }

    pub fn widget(&self, scope: &NodeScope) -> Option<LayoutWidget> {
        self.widget_constructor
            .as_ref()
            .map(|constructor| constructor(scope))
    }

    /// True when the node has neither children nor a widget.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.widget_constructor.is_none()
    }

    pub fn layout_result(&self) -> Option<LayoutResult> {
        self.layout_result.borrow().clone()
    }

    pub(crate) fn set_layout_result(&self, result: LayoutResult) {
        *self.layout_result.borrow_mut() = Some(result);
    }

    /// Clears the cached layout of this node and its descendants.
    pub fn clear_layout_results(&self) {
        self.layout_result.borrow_mut().take();
        for child in &self.children {
            child.clear_layout_results();
        }
    }

    /// Depth-first search, this node included.
    pub fn find(&self, predicate: &dyn Fn(&LayoutNode) -> bool) -> Option<&LayoutNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find(predicate))
    }

    /// Number of nodes in the subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }
}

impl TreeNode for LayoutNode {
    fn id(&self) -> Identifier {
        self.id
    }

    fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for LayoutNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut slots: Vec<&str> = self.slots.keys().collect();
        slots.sort_unstable();
        f.debug_struct("LayoutNode")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("modifier", &self.modifier)
            .field("slots", &slots)
            .field("widget", &self.widget_constructor.is_some())
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod tests;
