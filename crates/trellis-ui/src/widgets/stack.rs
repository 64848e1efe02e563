//! Stack: children drawn on top of each other.
//!
//! The stack is also the default widget of a node without one. Children
//! marked with `match_parent_size` are measured last, tightly at the size
//! the other children produced.

#![allow(non_snake_case)]

use std::rc::Rc;

use trellis_core::Identifier;
use trellis_foundation::LayoutWidget;
use trellis_ui_graphics::{CallOp, IntPoint};
use trellis_ui_layout::{Alignment, Constraints, Dimensions, LayoutContext};

use crate::composer::Composer;
use crate::coordinator::NodeCoordinator;
use crate::modifier::Modifier;
use crate::modifier_nodes::{MatchParentSizeElement, MATCH_PARENT_SIZE_KEY};
use crate::widgets::layout::Layout;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StackSpec {
    pub alignment: Alignment,
}

impl StackSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Default widget: stack at the top-start corner.
pub(crate) fn stack_widget(children: Vec<Rc<NodeCoordinator>>) -> LayoutWidget {
    aligned_stack_widget(children, Alignment::TOP_START)
}

pub(crate) fn aligned_stack_widget(
    children: Vec<Rc<NodeCoordinator>>,
    alignment: Alignment,
) -> LayoutWidget {
    Rc::new(move |gtx: &mut LayoutContext| {
        let constraints = gtx.constraints;
        let loose = constraints.loosen();
        let mut measured: Vec<Option<(Dimensions, CallOp)>> = vec![None; children.len()];
        let mut size = constraints.min;
        let mut baseline = 0;

        for (index, child) in children.iter().enumerate() {
            if child
                .parent_data::<MatchParentSizeElement>(MATCH_PARENT_SIZE_KEY)
                .is_some()
            {
                continue;
            }
            let (dims, call) = child.measure(gtx, loose);
            size = size.max(dims.size);
            if dims.baseline > 0 {
                baseline = dims.baseline;
            }
            measured[index] = Some((dims, call));
        }
        let size = constraints.constrain(size);

        for (index, child) in children.iter().enumerate() {
            if measured[index].is_none() {
                measured[index] = Some(child.measure(gtx, Constraints::tight(size)));
            }
        }

        for (dims, call) in measured.iter().flatten() {
            let offset = alignment.align(size, dims.size);
            gtx.ops.add_at(call, offset);
        }

        Dimensions { size, baseline }
    })
}

/// Composes `content` as a stack aligned per `spec`.
pub fn Stack(
    composer: &mut Composer<'_>,
    modifier: Modifier,
    spec: StackSpec,
    content: impl FnOnce(&mut Composer<'_>),
) -> Identifier {
    Layout(
        composer,
        "Stack",
        modifier,
        move |scope| aligned_stack_widget(scope.children().to_vec(), spec.alignment),
        content,
    )
}

/// Empty stack filling the minimum constraints.
pub(crate) fn min_size_widget() -> LayoutWidget {
    Rc::new(|gtx: &mut LayoutContext| Dimensions::new(gtx.constraints.constrain(IntPoint::ZERO)))
}
