//! Pure math/data for drawing & units in Trellis
//!
//! This crate contains geometry primitives, color definitions with HSL
//! math, unit types, and the recorded draw-op list handed to backends.

mod color;
mod geometry;
mod ops;
mod unit;

pub use color::*;
pub use geometry::*;
pub use ops::*;
pub use unit::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{EdgeInsets, IntPoint, IntRect, Point};
    pub use crate::ops::{CallOp, DrawOp, Ops, Tag};
    pub use crate::unit::{Dp, Sp};
}
