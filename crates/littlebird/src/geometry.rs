//! Core geometry types for littlebird.
//!
//! ## Rust Lesson #3: Copy types
//!
//! Every type here is a handful of `f64`s, so they all derive `Copy`.
//! Passing a `Vector` by value is as cheap as passing a reference, and
//! "mutating" one always means building a new value. There is no shared
//! ownership to think about.

use std::ops::{Add, Mul, Neg, Sub};

/// A 2D vector (or point) with x,y components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Two non-parallel vectors spanning a lattice.
///
/// # Precondition
///
/// `v` and `w` must not be collinear. Coefficient conversion divides by the
/// determinant, so a degenerate basis produces NaN/infinite coefficients.
/// Use [`Basis::is_degenerate`] to check before searching a lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub v: Vector,
    pub w: Vector,
}

/// An axis-aligned rectangle.
///
/// `top_left` is expected to be component-wise `<=` `bottom_right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub top_left: Vector,
    pub bottom_right: Vector,
}

/// Uniform scale followed by a translation (no rotation).
///
/// This is the view transform: pan is `translation`, zoom is `scaling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub translation: Vector,
    pub scaling: f64,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn scale(self, alpha: f64) -> Vector {
        Vector::new(self.x * alpha, self.y * alpha)
    }

    #[inline]
    pub fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    #[inline]
    pub fn subtract(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }

    #[inline]
    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length.
    #[inline]
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Round both components to the nearest integer (half away from zero).
    #[inline]
    pub fn round(self) -> Vector {
        Vector::new(self.x.round(), self.y.round())
    }

    /// True if both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ## Rust Lesson #8: Operator overloading
//
// Implementing `Add`, `Sub`, ... lets us write `a + b` instead of
// `a.add(b)`. The named methods stay around because they read better in
// long chains like `basis.v.scale(a).add(basis.w.scale(b))`.

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self.subtract(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.scale(rhs)
    }
}

impl Basis {
    #[inline]
    pub const fn new(v: Vector, w: Vector) -> Self {
        Self { v, w }
    }

    /// `v.x * w.y - v.y * w.x`
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.v.x * self.w.y - self.v.y * self.w.x
    }

    /// True if the vectors are (numerically) collinear or not finite.
    ///
    /// The tolerance is relative to the vector lengths, so a basis scaled by
    /// a zoom factor stays degenerate or non-degenerate together.
    pub fn is_degenerate(&self) -> bool {
        let det = self.determinant();
        if !det.is_finite() {
            return true;
        }
        det.abs() <= f64::EPSILON * self.v.norm() * self.w.norm()
    }

    /// Express `z` as `alpha * v + beta * w`, returning `(alpha, beta)`.
    ///
    /// Solved with Cramer's rule:
    /// `alpha = (z x w) / (v x w)`, `beta = (v x z) / (v x w)`
    /// where `x` is the z-component of the 2D cross product.
    pub fn to_coefficients(&self, z: Vector) -> Vector {
        let det = self.determinant();
        let alpha = (z.x * self.w.y - z.y * self.w.x) / det;
        let beta = (self.v.x * z.y - self.v.y * z.x) / det;
        Vector::new(alpha, beta)
    }

    /// Weighted sum `c.x * v + c.y * w`. Coefficients are usually integers.
    #[inline]
    pub fn from_coefficients(&self, coefficients: Vector) -> Vector {
        self.v.scale(coefficients.x).add(self.w.scale(coefficients.y))
    }

    /// Scale both basis vectors by `t`.
    #[inline]
    pub fn scale(&self, t: f64) -> Basis {
        Basis::new(self.v.scale(t), self.w.scale(t))
    }
}

impl Rectangle {
    #[inline]
    pub const fn new(top_left: Vector, bottom_right: Vector) -> Self {
        Self { top_left, bottom_right }
    }

    /// Top-left, bottom-left, bottom-right, top-right.
    pub fn corners(&self) -> [Vector; 4] {
        [
            self.top_left,
            Vector::new(self.top_left.x, self.bottom_right.y),
            self.bottom_right,
            Vector::new(self.bottom_right.x, self.top_left.y),
        ]
    }

    #[inline]
    pub fn center(&self) -> Vector {
        Vector::new(
            (self.top_left.x + self.bottom_right.x) / 2.0,
            (self.top_left.y + self.bottom_right.y) / 2.0,
        )
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    #[inline]
    pub fn translate(&self, v: Vector) -> Rectangle {
        Rectangle::new(self.top_left + v, self.bottom_right + v)
    }

    /// Apply scale + translation to both corners.
    pub fn transform(&self, transformation: &Transformation) -> Rectangle {
        Rectangle::new(
            transformation.transform(self.top_left),
            transformation.transform(self.bottom_right),
        )
    }

    /// Smallest axis-aligned square with the same center that contains this
    /// rectangle. Side length is `max(width, height)`.
    pub fn containing_square(&self) -> Rectangle {
        let half_side = self.width().max(self.height()) / 2.0;
        let center = self.center();
        let half = Vector::new(half_side, half_side);
        Rectangle::new(center - half, center + half)
    }

    /// Interval overlap on both axes. Touching edges count as overlapping.
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        let overlaps_x =
            self.top_left.x <= other.bottom_right.x && other.top_left.x <= self.bottom_right.x;
        let overlaps_y =
            self.top_left.y <= other.bottom_right.y && other.top_left.y <= self.bottom_right.y;
        overlaps_x && overlaps_y
    }
}

impl Transformation {
    pub const IDENTITY: Transformation = Transformation {
        translation: Vector::ZERO,
        scaling: 1.0,
    };

    #[inline]
    pub const fn new(translation: Vector, scaling: f64) -> Self {
        Self { translation, scaling }
    }

    /// `v * scaling + translation`
    #[inline]
    pub fn transform(&self, v: Vector) -> Vector {
        v.scale(self.scaling).add(self.translation)
    }

    /// Same scaling, translation shifted by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vector) -> Transformation {
        Transformation::new(self.translation + offset, self.scaling)
    }

    /// Pan by a pixel delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.translation = self.translation + Vector::new(dx, dy);
    }

    /// Zoom by `ratio` keeping the pixel point `center` fixed on screen.
    pub fn zoom_about(&mut self, center: Vector, ratio: f64) {
        self.scaling *= ratio;
        self.translation = self.translation.scale(ratio) - center.scale(ratio - 1.0);
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Transformation::IDENTITY
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SQRT3: f64 = 1.732_050_807_568_877_2;

    fn close(a: Vector, b: Vector) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn vector_arithmetic() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(3.0, -1.0);
        assert_eq!(a + b, Vector::new(4.0, 1.0));
        assert_eq!(a - b, Vector::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vector::new(2.0, 4.0));
        assert_eq!(-a, Vector::new(-1.0, -2.0));
        assert_eq!(a.dot(b), 1.0);
        assert_eq!(Vector::new(3.0, 4.0).norm(), 5.0);
        assert_eq!(Vector::new(1.4, -2.6).round(), Vector::new(1.0, -3.0));
    }

    #[test]
    fn coefficients_round_trip() {
        let basis = Basis::new(Vector::new(-SQRT3, 3.0), Vector::new(8.0 * SQRT3, 0.0));
        for z in [
            Vector::new(0.0, 0.0),
            Vector::new(12.5, -7.25),
            Vector::new(-1000.0, 333.0),
        ] {
            let back = basis.from_coefficients(basis.to_coefficients(z));
            assert!(close(back, z), "round trip of {:?} gave {:?}", z, back);
        }
    }

    #[test]
    fn basis_vectors_have_unit_coefficients() {
        let basis = Basis::new(Vector::new(0.0, 12.0), Vector::new(2.0 * SQRT3, 0.0));
        assert!(close(basis.to_coefficients(basis.v), Vector::new(1.0, 0.0)));
        assert!(close(basis.to_coefficients(basis.w), Vector::new(0.0, 1.0)));
    }

    #[test]
    fn degenerate_basis_detected() {
        let parallel = Basis::new(Vector::new(1.0, 2.0), Vector::new(-2.0, -4.0));
        assert!(parallel.is_degenerate());
        let zero = Basis::new(Vector::ZERO, Vector::new(1.0, 0.0));
        assert!(zero.is_degenerate());
        let fine = Basis::new(Vector::new(0.0, 12.0), Vector::new(2.0 * SQRT3, 0.0));
        assert!(!fine.is_degenerate());
        assert!(!fine.scale(1e-6).is_degenerate());
        assert!(parallel.to_coefficients(Vector::new(1.0, 1.0)).x.is_infinite());
    }

    #[test]
    fn rectangle_measurements() {
        let r = Rectangle::new(Vector::new(-1.0, 2.0), Vector::new(3.0, 4.0));
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 2.0);
        assert_eq!(r.center(), Vector::new(1.0, 3.0));
        assert_eq!(r.corners()[1], Vector::new(-1.0, 4.0));
        assert_eq!(r.corners()[3], Vector::new(3.0, 2.0));
    }

    #[test]
    fn containing_square_keeps_center() {
        let r = Rectangle::new(Vector::new(0.0, 0.0), Vector::new(1200.0, 800.0));
        let sq = r.containing_square();
        assert_eq!(sq.center(), r.center());
        assert_eq!(sq.width(), 1200.0);
        assert_eq!(sq.height(), 1200.0);
        assert_eq!(sq.top_left, Vector::new(0.0, -200.0));
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = Rectangle::new(Vector::new(0.0, 0.0), Vector::new(1.0, 1.0));
        let touching = Rectangle::new(Vector::new(1.0, 1.0), Vector::new(2.0, 2.0));
        let apart = Rectangle::new(Vector::new(1.5, 0.0), Vector::new(2.0, 1.0));
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn rectangle_transform() {
        let r = Rectangle::new(Vector::new(-1.0, -1.0), Vector::new(1.0, 1.0));
        let t = Transformation::new(Vector::new(600.0, 400.0), 40.0);
        let out = r.transform(&t);
        assert_eq!(out.top_left, Vector::new(560.0, 360.0));
        assert_eq!(out.bottom_right, Vector::new(640.0, 440.0));
        assert_eq!(r.translate(Vector::new(2.0, 0.0)).center(), Vector::new(2.0, 0.0));
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut t = Transformation::new(Vector::new(600.0, 400.0), 40.0);
        let anchor = Vector::new(250.0, 130.0);
        // World point currently under the anchor
        let world = (anchor - t.translation).scale(1.0 / t.scaling);

        t.zoom_about(anchor, 1.02);
        assert!((t.scaling - 40.8).abs() < 1e-9);
        assert!(close(t.transform(world), anchor));

        t.pan(10.0, -5.0);
        assert!(close(t.transform(world), anchor + Vector::new(10.0, -5.0)));
    }
}
