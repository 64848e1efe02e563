//! The generic layout primitive every built-in widget is made of.

#![allow(non_snake_case)]

use std::rc::Rc;

use trellis_core::Identifier;
use trellis_foundation::LayoutWidget;

use crate::composer::Composer;
use crate::modifier::Modifier;
use crate::node::NodeScope;

/// Opens a block labelled `key`, applies `modifier`, registers `widget` and
/// composes `content` as its children. Returns the block's identifier.
pub fn Layout<W>(
    composer: &mut Composer<'_>,
    key: &str,
    modifier: Modifier,
    widget: W,
    content: impl FnOnce(&mut Composer<'_>),
) -> Identifier
where
    W: Fn(&NodeScope) -> LayoutWidget + 'static,
{
    composer.start_block(key);
    composer.modifier(|current| current.then(modifier));
    composer.set_widget_constructor(Rc::new(widget));
    content(composer);
    let id = composer.get_id();
    composer.end_block();
    id
}
