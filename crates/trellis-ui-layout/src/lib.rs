//! Layout contracts & policies for Trellis

mod alignment;
mod arrangement;
mod axis;
mod constraints;
mod context;
mod input;

pub use alignment::*;
pub use arrangement::*;
pub use axis::*;
pub use constraints::*;
pub use context::*;
pub use input::*;

pub mod prelude {
    pub use crate::alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
    pub use crate::arrangement::LinearArrangement;
    pub use crate::constraints::Constraints;
    pub use crate::context::{Dimensions, FramePhase, LayoutContext};
    pub use crate::input::{InputSource, PointerEvent, PointerKind, PointerQueue};
}
