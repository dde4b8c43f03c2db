use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point in screen space (device-independent pixels, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared distance, used on hot paths to avoid a square root per pair.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Rotates this point around `origin` by `angle_degrees` (clockwise on screen).
    #[must_use]
    pub fn rotate_around(self, origin: Self, angle_degrees: f64) -> Self {
        if angle_degrees == 0.0 {
            return self;
        }
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        Self::new(origin.x + dx * cos - dy * sin, origin.y + dx * sin + dy * cos)
    }
}

impl Add<ScreenVector> for ScreenPoint {
    type Output = ScreenPoint;

    fn add(self, rhs: ScreenVector) -> Self::Output {
        ScreenPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<ScreenVector> for ScreenPoint {
    type Output = ScreenPoint;

    fn sub(self, rhs: ScreenVector) -> Self::Output {
        ScreenPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub for ScreenPoint {
    type Output = ScreenVector;

    fn sub(self, rhs: ScreenPoint) -> Self::Output {
        ScreenVector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A displacement in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenVector {
    pub x: f64,
    pub y: f64,
}

impl ScreenVector {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector, or the zero vector when the length is zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::default();
        }
        Self::new(self.x / length, self.y / length)
    }
}

impl Add for ScreenVector {
    type Output = ScreenVector;

    fn add(self, rhs: ScreenVector) -> Self::Output {
        ScreenVector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for ScreenVector {
    type Output = ScreenVector;

    fn mul(self, rhs: f64) -> Self::Output {
        ScreenVector::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for ScreenVector {
    type Output = ScreenVector;

    fn neg(self) -> Self::Output {
        ScreenVector::new(-self.x, -self.y)
    }
}

/// Width/height pair in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const EMPTY: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Smallest size containing both `self` and `other`.
    #[must_use]
    pub fn include(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Bounding box of a `self`-sized box rotated by `angle_degrees`.
    #[must_use]
    pub fn rotated_bounds(self, angle_degrees: f64) -> Self {
        if angle_degrees == 0.0 {
            return self;
        }
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        Self::new(
            self.width * cos + self.height * sin,
            self.width * sin + self.height * cos,
        )
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds a rectangle from two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center(self) -> ScreenPoint {
        ScreenPoint::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    #[must_use]
    pub fn top_left(self) -> ScreenPoint {
        ScreenPoint::new(self.left, self.top)
    }

    #[must_use]
    pub fn bottom_right(self) -> ScreenPoint {
        ScreenPoint::new(self.right(), self.bottom())
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[must_use]
    pub fn contains(self, point: ScreenPoint) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    #[must_use]
    pub fn intersects(self, other: ScreenRect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }

    /// Intersection of two rectangles; zero-sized when they do not overlap.
    #[must_use]
    pub fn intersect(self, other: ScreenRect) -> Self {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return Self::new(left, top, 0.0, 0.0);
        }
        Self::new(left, top, right - left, bottom - top)
    }

    /// Grows (or shrinks, for negative values) the rectangle on all sides.
    #[must_use]
    pub fn inflate(self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.left - dx,
            self.top - dy,
            (self.width + 2.0 * dx).max(0.0),
            (self.height + 2.0 * dy).max(0.0),
        )
    }

    #[must_use]
    pub fn corners(self) -> [ScreenPoint; 4] {
        [
            ScreenPoint::new(self.left, self.top),
            ScreenPoint::new(self.right(), self.top),
            ScreenPoint::new(self.right(), self.bottom()),
            ScreenPoint::new(self.left, self.bottom()),
        ]
    }
}
