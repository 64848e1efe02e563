//! Animation primitives for Trellis
//!
//! Time-based only: easing curves, tween specs and the visibility animation
//! behind `AnimatedVisibility`. Physics-based animation is not provided.

mod easing;
mod visibility;

pub use easing::{AnimationSpec, Easing, Lerp};
pub use visibility::VisibilityAnimation;
