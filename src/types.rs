//! Geometric primitives shared by layout and outline construction.
//!
//! Everything is plain `f64` in the host's point space. The unchecked
//! constructors are total; use the `try_*`/`check_*` helpers for values that
//! come from measurement or configuration.

use std::fmt;

use glam::{DVec2, dvec2};
use thiserror::Error;

/// Error type for invalid numeric values
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    #[error("value is NaN")]
    NaN,
    /// Value is infinite
    #[error("value is infinite")]
    Infinite,
    /// Value is negative when non-negative required
    #[error("value is negative")]
    Negative,
}

/// Reject NaN and infinite values.
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Reject NaN, infinite and negative values.
#[inline]
pub fn check_non_negative(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// A position, either in container coordinates or popover-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.x, self.y)
    }

    /// Shift by `origin`, e.g. to map a popover-local point into container space.
    #[inline]
    pub fn offset_by(self, origin: Point) -> Point {
        Point::new(self.x + origin.x, self.y + origin.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.to_dvec2()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A measured extent.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    /// Create a Size with validation (rejects NaN, infinite and negative sides)
    pub fn try_new(width: f64, height: f64) -> Result<Self, NumericError> {
        Ok(Size {
            width: check_non_negative(width)?,
            height: check_non_negative(height)?,
        })
    }

    /// True when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow the width by `dw` and the height by `dh`.
    #[inline]
    pub fn inflate(self, dw: f64, dh: f64) -> Size {
        Size::new(self.width + dw, self.height + dh)
    }

    /// Round both sides up to whole units.
    pub fn ceil(self) -> Size {
        Size::new(self.width.ceil(), self.height.ceil())
    }

    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Rect::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Half-open containment: the max edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{x: {}, y: {}, w: {}, h: {}}}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Simple color model, written out as a CSS color.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, u8),
}

impl Color {
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into())
    }

    pub fn white() -> Self {
        Color::Rgb(255, 255, 255)
    }

    pub fn gray() -> Self {
        Color::Rgb(128, 128, 128)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(s) => write!(f, "{}", s),
            Color::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
            Color::Rgba(r, g, b, a) => {
                write!(f, "rgba({},{},{},{})", r, g, b, f64::from(*a) / 255.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(100.0, 500.0, 60.0, 30.0);
        assert_eq!(r.min_x(), 100.0);
        assert_eq!(r.mid_x(), 130.0);
        assert_eq!(r.max_x(), 160.0);
        assert_eq!(r.mid_y(), 515.0);
        assert_eq!(r.max_y(), 530.0);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.99, 9.99)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
        assert!(!r.contains(Point::new(5.0, -0.1)));
    }

    #[test]
    fn size_validation() {
        assert!(Size::try_new(3.0, 4.0).is_ok());
        assert_eq!(Size::try_new(-1.0, 4.0), Err(NumericError::Negative));
        assert_eq!(Size::try_new(1.0, f64::NAN), Err(NumericError::NaN));
        assert_eq!(Size::try_new(f64::INFINITY, 1.0), Err(NumericError::Infinite));
    }

    #[test]
    fn size_ceil_rounds_up() {
        assert_eq!(Size::new(10.2, 16.8).ceil(), Size::new(11.0, 17.0));
    }

    #[test]
    fn color_css() {
        assert_eq!(Color::gray().to_string(), "rgb(128,128,128)");
        assert_eq!(Color::named("red").to_string(), "red");
        assert_eq!(Color::Rgba(0, 0, 0, 255).to_string(), "rgba(0,0,0,1)");
    }

    #[test]
    fn point_dvec2_conversion() {
        let p = Point::new(1.5, -2.0);
        let v: DVec2 = p.into();
        assert_eq!(Point::from(v), p);
    }
}
