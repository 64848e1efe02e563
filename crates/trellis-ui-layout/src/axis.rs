use trellis_ui_graphics::IntPoint;

/// The main axis of a linear layout (Row or Column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row: main axis left to right, cross axis top to bottom.
    Horizontal,
    /// Column: main axis top to bottom, cross axis left to right.
    Vertical,
}

impl Axis {
    /// Returns the opposite axis.
    #[inline]
    pub fn cross_axis(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::Horizontal)
    }

    /// Component of `point` along this axis.
    #[inline]
    pub fn main(self, point: IntPoint) -> i32 {
        match self {
            Axis::Horizontal => point.x,
            Axis::Vertical => point.y,
        }
    }

    /// Component of `point` across this axis.
    #[inline]
    pub fn cross(self, point: IntPoint) -> i32 {
        self.cross_axis().main(point)
    }

    /// Builds a point from main and cross components.
    #[inline]
    pub fn point(self, main: i32, cross: i32) -> IntPoint {
        match self {
            Axis::Horizontal => IntPoint::new(main, cross),
            Axis::Vertical => IntPoint::new(cross, main),
        }
    }
}
