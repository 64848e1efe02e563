//! Debug utilities for inspecting a composed tree and its recorded ops.
//!
//! ```rust,ignore
//! let root = composition.compose();
//! log_layout_tree(&root);
//! let call = runtime.run(&mut gtx, &root);
//! log_ops(&call);
//! ```

use std::fmt::Write;

use trellis_ui_graphics::{CallOp, FlatOp};

use crate::node::LayoutNode;

/// Indented outline of `root`: key, id, modifier, slots and the cached
/// layout size when the node has been laid out.
pub fn format_layout_tree(root: &LayoutNode) -> String {
    let mut output = String::new();
    format_node(&mut output, root, 0);
    output
}

fn format_node(output: &mut String, node: &LayoutNode, depth: usize) {
    let indent = "  ".repeat(depth);
    write!(output, "{indent}{}#{}", node.key(), node.id()).ok();
    if !node.modifier().is_empty() {
        write!(output, " {:?}", node.modifier()).ok();
    }
    let mut slots: Vec<&str> = node.slots().keys().collect();
    if !slots.is_empty() {
        slots.sort_unstable();
        write!(output, " slots={}", slots.join(",")).ok();
    }
    if let Some(text) = node.slot::<String>("text") {
        write!(output, " {text:?}").ok();
    }
    if let Some(result) = node.layout_result() {
        let size = result.dimensions.size;
        write!(output, " size=({}x{})", size.x, size.y).ok();
    }
    writeln!(output).ok();

    for child in node.children() {
        format_node(output, child, depth + 1);
    }
}

pub fn log_layout_tree(root: &LayoutNode) {
    log::debug!("layout tree:\n{}", format_layout_tree(root));
}

/// One line per flattened primitive, in paint order.
pub fn format_ops(call: &CallOp) -> String {
    let mut output = String::new();
    for (index, op) in call.flatten().iter().enumerate() {
        match op {
            FlatOp::Rect { rect, color } => writeln!(
                output,
                "[{index}] rect ({}, {})-({}, {}) {color:?}",
                rect.min.x, rect.min.y, rect.max.x, rect.max.y
            ),
            FlatOp::Text {
                rect,
                text,
                size_px,
                ..
            } => writeln!(
                output,
                "[{index}] text ({}, {})-({}, {}) {size_px}px {text:?}",
                rect.min.x, rect.min.y, rect.max.x, rect.max.y
            ),
            FlatOp::PointerArea { rect, tag } => writeln!(
                output,
                "[{index}] pointer ({}, {})-({}, {}) {tag:?}",
                rect.min.x, rect.min.y, rect.max.x, rect.max.y
            ),
        }
        .ok();
    }
    output
}

pub fn log_ops(call: &CallOp) {
    log::debug!("ops:\n{}", format_ops(call));
}

/// Number of nodes in the tree.
pub fn count_nodes(root: &LayoutNode) -> usize {
    root.subtree_len()
}

/// Texts drawn by `call`, in paint order.
pub fn drawn_texts(call: &CallOp) -> Vec<String> {
    call.flatten()
        .into_iter()
        .filter_map(|op| match op {
            FlatOp::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/debug_tests.rs"]
mod tests;
