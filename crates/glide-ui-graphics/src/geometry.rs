//! Geometric primitives: Point, Size, Translation

use std::ops::{Add, AddAssign, Sub};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };
}

/// A 2-D translation applied to a container's content.
///
/// `Translation::IDENTITY` is the untransformed state; hosts may render it
/// by clearing the transform entirely.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub const IDENTITY: Translation = Translation { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl std::fmt::Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "translate({}px, {}px)", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let mut p = Point::new(100.0, 100.0);
        let delta = Point::new(120.0, 130.0) - p;
        assert_eq!(delta, Point::new(20.0, 30.0));
        p += delta;
        assert_eq!(p, Point::new(120.0, 130.0));
    }

    #[test]
    fn translation_formats_like_css() {
        assert_eq!(Translation::new(-50.0, 0.0).to_string(), "translate(-50px, 0px)");
        assert!(Translation::IDENTITY.is_identity());
    }
}
