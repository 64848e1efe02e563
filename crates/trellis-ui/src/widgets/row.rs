//! Row widget implementation

#![allow(non_snake_case)]

use std::rc::Rc;

use trellis_core::Identifier;
use trellis_ui_layout::{Axis, VerticalAlignment, LinearArrangement};

use super::layout::Layout;
use super::linear::linear_widget;
use crate::composer::Composer;
use crate::modifier::Modifier;

/// Specification for Row layout behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowSpec {
    pub horizontal_arrangement: LinearArrangement,
    pub vertical_alignment: VerticalAlignment,
}

impl RowSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn horizontal_arrangement(mut self, arrangement: LinearArrangement) -> Self {
        self.horizontal_arrangement = arrangement;
        self
    }

    pub fn vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }
}

/// Places `content` start to end.
pub fn Row(
    composer: &mut Composer<'_>,
    modifier: Modifier,
    spec: RowSpec,
    content: impl FnOnce(&mut Composer<'_>),
) -> Identifier {
    Layout(
        composer,
        "Row",
        modifier,
        move |scope| {
            let alignment = spec.vertical_alignment;
            linear_widget(
                Axis::Horizontal,
                spec.horizontal_arrangement,
                Rc::new(move |available, child| alignment.align(available, child)),
                scope.children().to_vec(),
            )
        },
        content,
    )
}
