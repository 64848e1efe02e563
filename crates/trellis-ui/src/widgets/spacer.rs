//! Spacer widget implementation

#![allow(non_snake_case)]

use trellis_core::Identifier;

use super::layout::Layout;
use super::stack::min_size_widget;
use crate::composer::Composer;
use crate::modifier::Modifier;

/// Empty space. Its size comes from `modifier` (`size`, `width`, `height`
/// or `weight`); without one it takes the minimum the parent allows.
pub fn Spacer(composer: &mut Composer<'_>, modifier: Modifier) -> Identifier {
    Layout(composer, "Spacer", modifier, |_| min_size_widget(), |_| {})
}
