//! Geometric primitives: Point, IntPoint, IntRect, EdgeInsets

use std::ops::{Add, AddAssign, Sub};

/// Pointer-space position in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

/// Integer pixel vector, used for layout sizes and offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct IntPoint {
    pub x: i32,
    pub y: i32,
}

impl IntPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const ZERO: IntPoint = IntPoint { x: 0, y: 0 };

    pub fn max(self, other: IntPoint) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn min(self, other: IntPoint) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

impl Add for IntPoint {
    type Output = IntPoint;

    fn add(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for IntPoint {
    fn add_assign(&mut self, rhs: IntPoint) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for IntPoint {
    type Output = IntPoint;

    fn sub(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Half-open integer rectangle `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    pub min: IntPoint,
    pub max: IntPoint,
}

impl IntRect {
    pub const fn new(min: IntPoint, max: IntPoint) -> Self {
        Self { min, max }
    }

    /// Rectangle at the origin covering `size`.
    pub fn from_size(size: IntPoint) -> Self {
        Self::new(IntPoint::ZERO, size)
    }

    pub fn size(&self) -> IntPoint {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    pub fn translate(&self, offset: IntPoint) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    pub fn intersect(&self, other: &IntRect) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x as f32
            && point.y >= self.min.y as f32
            && point.x < self.max.x as f32
            && point.y < self.max.y as f32
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) as f32 / 2.0,
            (self.min.y + self.max.y) as f32 / 2.0,
        )
    }
}

/// Padding values for each edge of a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl EdgeInsets {
    pub fn uniform(all: f32) -> Self {
        Self {
            left: all,
            top: all,
            right: all,
            bottom: all,
        }
    }

    pub fn horizontal(horizontal: f32) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            ..Self::default()
        }
    }

    pub fn vertical(vertical: f32) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            ..Self::default()
        }
    }

    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        }
    }

    pub fn from_components(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }

    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }
}

impl AddAssign for EdgeInsets {
    fn add_assign(&mut self, rhs: Self) {
        self.left += rhs.left;
        self.top += rhs.top;
        self.right += rhs.right;
        self.bottom += rhs.bottom;
    }
}
