#![forbid(unsafe_code)]

//! Geometric primitives in point space.
//!
//! All coordinates use a top-left origin with `y` growing downward, matching
//! the coordinate space a host hands to the transition engine.

use std::ops::{Add, Mul, Sub};

/// Linear interpolation between two values of the same type.
///
/// `t` is not clamped; callers clamp progress before sampling when they need
/// endpoint-bounded output.
pub trait Lerp: Sized {
    /// Interpolate from `self` (t = 0) to `other` (t = 1).
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

/// A point (or vector) in point space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when used as a vector.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Lerp for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Lerp for Size {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.width.lerp(&other.width, t),
            self.height.lerp(&other.height, t),
        )
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// The zero rectangle.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::new(0.0, 0.0),
    };

    /// Create a rectangle from origin and dimensions.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    #[inline]
    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.size.width / 2.0
    }

    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.origin.y + self.size.height / 2.0
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Whether the rectangle has zero area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Shrink the rectangle by `amount` on every edge.
    ///
    /// The result never has negative dimensions.
    #[must_use]
    pub fn inset(&self, amount: f64) -> Self {
        Self::new(
            self.origin.x + amount,
            self.origin.y + amount,
            (self.size.width - 2.0 * amount).max(0.0),
            (self.size.height - 2.0 * amount).max(0.0),
        )
    }

    /// The same size placed at the origin.
    #[must_use]
    pub fn bounds(&self) -> Self {
        Self::from_size(self.size)
    }

    /// Check if a point lies inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }
}

impl Lerp for Rect {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            origin: self.origin.lerp(&other.origin, t),
            size: self.size.lerp(&other.size, t),
        }
    }
}

/// A 2D affine transform restricted to scale + translation.
///
/// This is the only family the transition engine animates; keeping it
/// separable makes interpolation exact (no decomposition needed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// A pure scale.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    /// A pure translation.
    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: tx,
            translate_y: ty,
        }
    }

    /// Apply `self` first, then `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            scale_x: self.scale_x * other.scale_x,
            scale_y: self.scale_y * other.scale_y,
            translate_x: self.translate_x * other.scale_x + other.translate_x,
            translate_y: self.translate_y * other.scale_y + other.translate_y,
        }
    }

    /// Whether this is (numerically) the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        (self.scale_x - 1.0).abs() < f64::EPSILON
            && (self.scale_y - 1.0).abs() < f64::EPSILON
            && self.translate_x.abs() < f64::EPSILON
            && self.translate_y.abs() < f64::EPSILON
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale_x + self.translate_x,
            p.y * self.scale_y + self.translate_y,
        )
    }
}

impl Lerp for Transform {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            scale_x: self.scale_x.lerp(&other.scale_x, t),
            scale_y: self.scale_y.lerp(&other.scale_y, t),
            translate_x: self.translate_x.lerp(&other.translate_x, t),
            translate_y: self.translate_y.lerp(&other.translate_y, t),
        }
    }
}

/// An RGBA color with components in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const CLEAR: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Create a new color. Components are clamped to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }
}

impl Lerp for Rgba {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.r.lerp(&other.r, t),
            self.g.lerp(&other.g, t),
            self.b.lerp(&other.b, t),
            self.a.lerp(&other.a, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 40.0, 30.0);
        assert_eq!(r.mid_x(), 30.0);
        assert_eq!(r.max_y(), 50.0);
        assert_eq!(r.mid_y(), 35.0);
    }

    #[test]
    fn inset_never_negative() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0).inset(5.0);
        assert_eq!(r.width(), 0.0);
        assert_eq!(r.height(), 0.0);
        assert!(r.is_empty());
    }

    #[test]
    fn rect_lerp_midpoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(100.0, 50.0, 30.0, 20.0);
        assert_eq!(a.lerp(&b, 0.5), Rect::new(50.0, 25.0, 20.0, 15.0));
    }

    #[test]
    fn transform_concat_scales_then_translates() {
        let t = Transform::scale(2.0, 3.0).concat(&Transform::translation(5.0, -7.0));
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(7.0, -4.0));
    }

    #[test]
    fn identity_detection() {
        assert!(Transform::IDENTITY.is_identity());
        assert!(!Transform::translation(0.0, 1.0).is_identity());
    }

    #[test]
    fn color_clamped() {
        let c = Rgba::new(2.0, -1.0, 0.5, 1.0);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
    }

    #[test]
    fn color_lerp() {
        let mid = Rgba::WHITE.lerp(&Rgba::BLACK, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-9);
        assert!((mid.a - 1.0).abs() < 1e-9);
    }
}
