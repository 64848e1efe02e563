//! Layout constraints system

use trellis_ui_graphics::IntPoint;

/// Integer size bounds used during layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Constraints {
    pub min: IntPoint,
    pub max: IntPoint,
}

impl Constraints {
    pub const fn new(min: IntPoint, max: IntPoint) -> Self {
        Self { min, max }
    }

    /// Creates constraints with exact width and height.
    pub fn tight(size: IntPoint) -> Self {
        Self {
            min: size,
            max: size,
        }
    }

    /// Creates constraints with loose bounds (min = 0, max = given size).
    pub fn loose(max: IntPoint) -> Self {
        Self {
            min: IntPoint::ZERO,
            max,
        }
    }

    /// Returns true if these constraints have a single size that satisfies them.
    pub fn is_tight(&self) -> bool {
        self.min == self.max
    }

    #[inline]
    pub fn has_tight_width(&self) -> bool {
        self.min.x == self.max.x
    }

    #[inline]
    pub fn has_tight_height(&self) -> bool {
        self.min.y == self.max.y
    }

    /// Clamps `size` into the bounds.
    pub fn constrain(&self, size: IntPoint) -> IntPoint {
        IntPoint::new(
            size.x.clamp(self.min.x, self.max.x.max(self.min.x)),
            size.y.clamp(self.min.y, self.max.y.max(self.min.y)),
        )
    }

    /// Creates new constraints with tightened width (min = max = given width),
    /// clamped into the current bounds.
    pub fn tighten_width(self, width: i32) -> Self {
        let width = width.clamp(self.min.x, self.max.x.max(self.min.x));
        Self {
            min: IntPoint::new(width, self.min.y),
            max: IntPoint::new(width, self.max.y),
        }
    }

    /// Creates new constraints with tightened height, clamped into the current bounds.
    pub fn tighten_height(self, height: i32) -> Self {
        let height = height.clamp(self.min.y, self.max.y.max(self.min.y));
        Self {
            min: IntPoint::new(self.min.x, height),
            max: IntPoint::new(self.max.x, height),
        }
    }

    /// Deflates constraints by the given amount on each axis.
    /// This is useful for applying padding before measuring children.
    pub fn deflate(self, by: IntPoint) -> Self {
        Self {
            min: (self.min - by).max(IntPoint::ZERO),
            max: (self.max - by).max(IntPoint::ZERO),
        }
    }

    /// Creates new constraints with loosened minimums (min = 0).
    pub fn loosen(self) -> Self {
        Self {
            min: IntPoint::ZERO,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "tests/constraints_tests.rs"]
mod tests;
