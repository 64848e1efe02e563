//! Huet zipper over layout nodes.
//!
//! The focus is owned and mutable; every ancestor waits in a crumb together
//! with the siblings to the left of the path and, reversed, those to the
//! right. Descending, ascending and appending are all O(1).

use std::rc::Rc;

use trellis_core::NodePath;

use crate::node::LayoutNode;

#[derive(Debug)]
struct Crumb {
    parent: LayoutNode,
    left: Vec<Rc<LayoutNode>>,
    right_rev: Vec<Rc<LayoutNode>>,
}

#[derive(Debug, Default)]
pub struct Zipper {
    focus: Option<LayoutNode>,
    path: Vec<Crumb>,
}

impl Zipper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<&LayoutNode> {
        self.focus.as_ref()
    }

    pub fn focus_mut(&mut self) -> Option<&mut LayoutNode> {
        self.focus.as_mut()
    }

    /// Number of ancestors above the focus.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Makes `node` the focus as the last child of the current focus, or
    /// as the root when nothing is focused yet.
    pub fn descend(&mut self, node: LayoutNode) {
        if let Some(mut parent) = self.focus.take() {
            let left = parent.take_children();
            self.path.push(Crumb {
                parent,
                left,
                right_rev: Vec::new(),
            });
        }
        self.focus = Some(node);
    }

    /// Closes the focus into its parent. Returns false at the root.
    pub fn up(&mut self) -> bool {
        let Some(crumb) = self.path.pop() else {
            return false;
        };
        let Crumb {
            mut parent,
            mut left,
            right_rev,
        } = crumb;
        if let Some(focus) = self.focus.take() {
            left.push(Rc::new(focus));
        }
        left.extend(right_rev.into_iter().rev());
        parent.set_children(left);
        self.focus = Some(parent);
        true
    }

    /// Moves the focus to its previous sibling.
    pub fn left(&mut self) -> bool {
        let Some(crumb) = self.path.last_mut() else {
            return false;
        };
        let Some(previous) = crumb.left.pop() else {
            return false;
        };
        if let Some(focus) = self.focus.take() {
            crumb.right_rev.push(Rc::new(focus));
        }
        self.focus = Some(Rc::unwrap_or_clone(previous));
        true
    }

    /// Moves the focus to its next sibling.
    pub fn right(&mut self) -> bool {
        let Some(crumb) = self.path.last_mut() else {
            return false;
        };
        let Some(next) = crumb.right_rev.pop() else {
            return false;
        };
        if let Some(focus) = self.focus.take() {
            crumb.left.push(Rc::new(focus));
        }
        self.focus = Some(Rc::unwrap_or_clone(next));
        true
    }

    /// Identifiers of the focus's ancestors, root first.
    pub fn path_ids(&self) -> NodePath {
        self.path.iter().map(|crumb| crumb.parent.id()).collect()
    }

    /// Ascends to the root and hands it out, leaving the zipper empty.
    pub fn into_root(&mut self) -> Option<LayoutNode> {
        while self.up() {}
        self.focus.take()
    }
}

#[cfg(test)]
#[path = "tests/zipper_tests.rs"]
mod tests;
