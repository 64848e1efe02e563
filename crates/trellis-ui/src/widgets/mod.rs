//! UI Widget components

pub mod animated_visibility;
pub mod button;
pub mod column;
pub mod layout;
mod linear;
pub mod row;
pub mod spacer;
pub(crate) mod stack;
pub mod text;

pub use animated_visibility::*;
pub use button::*;
pub use column::*;
pub use layout::*;
pub use row::*;
pub use spacer::*;
pub use stack::{Stack, StackSpec};
pub use text::*;
