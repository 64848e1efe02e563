//! Column widget implementation

#![allow(non_snake_case)]

use std::rc::Rc;

use trellis_core::Identifier;
use trellis_ui_layout::{Axis, HorizontalAlignment, LinearArrangement};

use super::layout::Layout;
use super::linear::linear_widget;
use crate::composer::Composer;
use crate::modifier::Modifier;

/// Specification for Column layout behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnSpec {
    pub vertical_arrangement: LinearArrangement,
    pub horizontal_alignment: HorizontalAlignment,
}

impl ColumnSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertical_arrangement(mut self, arrangement: LinearArrangement) -> Self {
        self.vertical_arrangement = arrangement;
        self
    }

    pub fn horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.horizontal_alignment = alignment;
        self
    }
}

/// Places `content` top to bottom.
pub fn Column(
    composer: &mut Composer<'_>,
    modifier: Modifier,
    spec: ColumnSpec,
    content: impl FnOnce(&mut Composer<'_>),
) -> Identifier {
    Layout(
        composer,
        "Column",
        modifier,
        move |scope| {
            let alignment = spec.horizontal_alignment;
            linear_widget(
                Axis::Vertical,
                spec.vertical_arrangement,
                Rc::new(move |available, child| alignment.align(available, child)),
                scope.children().to_vec(),
            )
        },
        content,
    )
}
