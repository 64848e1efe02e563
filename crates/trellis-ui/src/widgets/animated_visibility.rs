//! Fades content in and out.

#![allow(non_snake_case)]

use trellis_animation::{AnimationSpec, VisibilityAnimation};
use trellis_core::Identifier;

use super::layout::Layout;
use super::stack::stack_widget;
use crate::composer::Composer;
use crate::modifier::Modifier;

/// Shows `content` while `visible`, fading between states with `spec`.
///
/// The transition is retained per call site and sampled at the composer's
/// frame time. While it runs the composer is asked for another frame; once
/// a fade-out completes the content leaves the composition and its state
/// is forgotten.
pub fn AnimatedVisibility(
    composer: &mut Composer<'_>,
    visible: bool,
    spec: AnimationSpec,
    modifier: Modifier,
    content: impl FnOnce(&mut Composer<'_>),
) -> Identifier {
    Layout(
        composer,
        "AnimatedVisibility",
        modifier,
        |scope| stack_widget(scope.children().to_vec()),
        move |composer| {
            let animation = composer
                .retain("visibility", || VisibilityAnimation::new(visible, spec))
                .unwrap_or_else(|err| panic!("{err}"));
            animation.set_spec(spec);

            let now = composer.frame_time();
            animation.set_visible(visible, now);
            let progress = animation.progress(now);
            if animation.is_running(now) {
                composer.request_frame();
            }
            if progress < 1.0 {
                composer.modifier(|current| current.then(Modifier::empty().alpha(progress)));
            }
            if animation.is_shown(now) {
                content(composer);
            }
        },
    )
}
