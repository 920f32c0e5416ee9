//! Fundamental geometric types for planar truss modelling.

use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::errors::GeometryError;

/// Number of decimal places kept when a position is used as a joint key.
///
/// Two positions closer than `10^-JOINT_KEY_DECIMALS` in both coordinates are
/// treated as the same joint, so this also bounds the smallest distinguishable
/// joint separation.
pub const JOINT_KEY_DECIMALS: i32 = 6;

/// Position or direction in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component. Zero marks the ground line.
    pub y: f64,
}

impl Vector2 {
    /// Create a [`Vector2`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Return the unit vector pointing the same way.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthVector`] when the vector has no length, since
    /// there is no direction to preserve.
    ///
    /// # Examples
    /// ```
    /// use bridgex::{vector, GeometryError};
    ///
    /// let unit = vector(3.0, 4.0).normalize().expect("non-zero vector");
    /// assert!((unit.x - 0.6).abs() < 1.0e-12);
    /// assert_eq!(vector(0.0, 0.0).normalize(), Err(GeometryError::ZeroLengthVector));
    /// ```
    pub fn normalize(self) -> Result<Self, GeometryError> {
        let length = self.norm();
        if length == 0.0 || !length.is_finite() {
            return Err(GeometryError::ZeroLengthVector);
        }
        Ok(self * (1.0 / length))
    }

    /// Multiply by a 2×2 matrix, treating the vector as a column.
    #[must_use]
    pub fn transform(self, matrix: &Matrix2<f64>) -> Self {
        Self::from(matrix * self.to_vector())
    }

    /// Rotate counter-clockwise by `degrees`.
    #[must_use]
    pub fn rotate(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.transform(&Matrix2::new(cos, -sin, sin, cos))
    }

    /// Round both components to `decimals` places.
    #[must_use]
    pub fn rounded(self, decimals: i32) -> Self {
        Self::new(round_to(self.x, decimals), round_to(self.y, decimals))
    }

    /// Canonical hashable key for this position.
    #[must_use]
    pub fn key(self) -> JointKey {
        JointKey::from(self)
    }

    /// Convert the vector into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::new(self.x, self.y)
    }
}

impl From<nalgebra::Vector2<f64>> for Vector2 {
    fn from(value: nalgebra::Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Vector2> for nalgebra::Vector2<f64> {
    fn from(value: Vector2) -> Self {
        value.to_vector()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector2> for f64 {
    type Output = Vector2;

    fn mul(self, vector: Vector2) -> Vector2 {
        vector * self
    }
}

/// Round `value` to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    // normalise -0.0 so it compares and prints like 0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Position rounded to [`JOINT_KEY_DECIMALS`] places, usable as a map key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointKey {
    /// Scaled and rounded horizontal component.
    x: i64,
    /// Scaled and rounded vertical component.
    y: i64,
}

impl From<Vector2> for JointKey {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: Vector2) -> Self {
        let scale = 10_f64.powi(JOINT_KEY_DECIMALS);
        Self {
            x: (value.x * scale).round() as i64,
            y: (value.y * scale).round() as i64,
        }
    }
}

/// A straight bar between two joints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// First endpoint.
    pub start: Vector2,
    /// Second endpoint.
    pub end: Vector2,
}

impl Member {
    /// Create a member between two positions.
    #[must_use]
    pub const fn new(start: Vector2, end: Vector2) -> Self {
        Self { start, end }
    }

    /// Vector from `start` to `end`.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    /// Length of the member.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.delta().norm()
    }

    /// Midpoint of the member, where a renderer would label its force.
    #[must_use]
    pub fn midpoint(&self) -> Vector2 {
        self.start + 0.5 * self.delta()
    }

    /// Return the endpoint that is not at `joint`, or `None` when `joint` is not an
    /// endpoint of this member.
    #[must_use]
    pub fn other_end(&self, joint: JointKey) -> Option<Vector2> {
        if self.start.key() == joint {
            Some(self.end)
        } else if self.end.key() == joint {
            Some(self.start)
        } else {
            None
        }
    }
}

/// Convenience helper for creating [`Vector2`] instances.
///
/// # Examples
/// ```
/// use bridgex::vector;
///
/// let origin = vector(0.0, 0.0);
/// assert_eq!(origin.y, 0.0);
/// ```
#[must_use]
pub const fn vector(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

/// Convenience helper for creating [`Member`] instances.
///
/// # Examples
/// ```
/// use bridgex::{member, vector};
///
/// let bar = member(vector(0.0, 0.0), vector(3.0, 4.0));
/// assert_eq!(bar.length(), 5.0);
/// ```
#[must_use]
pub const fn member(start: Vector2, end: Vector2) -> Member {
    Member::new(start, end)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn arithmetic_matches_component_wise_rules() {
        let a = vector(1.0, 2.0);
        let b = vector(-3.0, 0.5);
        assert_eq!(a + b, vector(-2.0, 2.5));
        assert_eq!(a - b, vector(4.0, 1.5));
        assert_eq!(2.0 * a, vector(2.0, 4.0));
        assert_eq!(-a, vector(-1.0, -2.0));
    }

    #[test]
    fn transform_flips_the_vertical_axis() {
        let flipped = vector(2.0, 3.0).transform(&Matrix2::new(1.0, 0.0, 0.0, -1.0));
        assert_eq!(flipped, vector(2.0, -3.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let turned = vector(1.0, 0.0).rotate(90.0);
        assert_relative_eq!(turned.x, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(turned.y, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn zero_vector_cannot_be_normalised() {
        assert_eq!(
            vector(0.0, 0.0).normalize(),
            Err(GeometryError::ZeroLengthVector)
        );
    }

    #[test]
    fn keys_merge_positions_below_precision() {
        let a = vector(2.5, 0.0);
        let b = vector(2.500_000_000_1, 0.0);
        let c = vector(2.500_01, 0.0);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(vector(0.0, -0.0).key(), vector(0.0, 0.0).key());
    }

    #[test]
    fn rounding_normalises_negative_zero() {
        let rounded = vector(-0.000_01, 1.234_56).rounded(4);
        assert_eq!(rounded, vector(0.0, 1.2346));
        assert!(rounded.x.is_sign_positive());
    }

    #[test]
    fn member_other_end_and_midpoint() {
        let bar = member(vector(0.0, 0.0), vector(4.0, 2.0));
        assert_eq!(bar.other_end(vector(0.0, 0.0).key()), Some(vector(4.0, 2.0)));
        assert_eq!(bar.other_end(vector(4.0, 2.0).key()), Some(vector(0.0, 0.0)));
        assert_eq!(bar.other_end(vector(1.0, 1.0).key()), None);
        assert_eq!(bar.midpoint(), vector(2.0, 1.0));
    }
}
