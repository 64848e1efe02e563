//! Button widget implementation

#![allow(non_snake_case)]

use trellis_core::Identifier;
use trellis_ui_graphics::Point;
use trellis_ui_layout::Alignment;

use super::layout::Layout;
use super::stack::aligned_stack_widget;
use crate::composer::Composer;
use crate::locals::composition_local_provider;
use crate::modifier::Modifier;
use crate::theme::{roles, ColorDescriptor, LOCAL_CONTENT_COLOR};

/// Inspector name the button splits the caller's modifier on.
pub const CLICKABLE: &str = "clickable";

/// Creates a button widget with click handling.
///
/// The caller's modifier is partitioned: clickables stay inside the
/// button's own click area, everything else wraps the button from the
/// outside. The click handler is kept in a retained cell, so the button's
/// clickable element stays equal across frames.
pub fn Button(
    composer: &mut Composer<'_>,
    modifier: Modifier,
    on_click: impl Fn() + 'static,
    content: impl FnOnce(&mut Composer<'_>),
) -> Identifier {
    let container = ColorDescriptor::role(roles::PRIMARY).resolve_current(composer);
    let content_color = ColorDescriptor::role(roles::ON_PRIMARY).resolve_current(composer);
    Layout(
        composer,
        "Button",
        Modifier::empty(),
        |scope| aligned_stack_widget(scope.children().to_vec(), Alignment::CENTER),
        move |composer| {
            let handler = composer.handler("on_click", move |_: Point| on_click());
            let (outer, inner) = modifier.partition(CLICKABLE);
            composer.modifier(move |current| {
                current
                    .then(outer)
                    .then(
                        Modifier::empty()
                            .background(container)
                            .clickable_handler(handler.entry()),
                    )
                    .then(inner)
                    .then(Modifier::empty().padding_symmetric(16.0, 8.0))
            });
            composition_local_provider(
                composer,
                vec![LOCAL_CONTENT_COLOR.provides(content_color)],
                content,
            );
        },
    )
}
