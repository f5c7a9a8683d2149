//! Double-precision 3D vector.
//!
//! Positions are kept in `f64` end to end; conversion to the engine's
//! single-precision `Vec3` happens only at the render boundary.

use bevy::math::{DVec3, Vec3};
use bevy::prelude::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

/// Magnitudes at or below this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f64 = 1.401298464324817e-45;

/// Two vectors compare equal when the squared length of their difference is below this.
pub const EQUALITY_EPSILON_SQR: f64 = 9.99999944e-11;

/// A 3D vector with `f64` components and value semantics.
///
/// Equality is approximate: see [`EQUALITY_EPSILON_SQR`]. Use the components
/// directly when bitwise comparison is needed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3d {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn magnitude(self) -> f64 {
        self.sqr_magnitude().sqrt()
    }

    pub fn sqr_magnitude(self) -> f64 {
        self.dot(self)
    }

    /// Unit vector in the same direction, or [`Vector3d::ZERO`] when the
    /// magnitude is at or below [`NORMALIZE_EPSILON`].
    pub fn normalized(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude > NORMALIZE_EPSILON {
            self / magnitude
        } else {
            debug!("normalizing degenerate vector {self}, returning zero");
            Self::ZERO
        }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }

    /// Component-wise product.
    pub fn scale(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Linear interpolation with `t` clamped to [0, 1].
    pub fn lerp(self, target: Self, t: f64) -> Self {
        self.lerp_unclamped(target, t.clamp(0.0, 1.0))
    }

    pub fn lerp_unclamped(self, target: Self, t: f64) -> Self {
        self + (target - self) * t
    }

    /// Step from `self` towards `target` by at most `max_distance`.
    pub fn move_towards(self, target: Self, max_distance: f64) -> Self {
        let delta = target - self;
        let distance = delta.magnitude();
        if distance <= max_distance || distance <= NORMALIZE_EPSILON {
            return target;
        }
        self + delta / distance * max_distance
    }

    /// Copy of `self` with its magnitude limited to `max_length`.
    pub fn clamp_magnitude(self, max_length: f64) -> Self {
        if self.sqr_magnitude() > max_length * max_length {
            self.normalized() * max_length
        } else {
            self
        }
    }

    /// Unsigned angle between two vectors in radians; 0 if either is degenerate.
    pub fn angle(self, other: Self) -> f64 {
        let denominator = (self.sqr_magnitude() * other.sqr_magnitude()).sqrt();
        if denominator <= NORMALIZE_EPSILON {
            return 0.0;
        }
        (self.dot(other) / denominator).clamp(-1.0, 1.0).acos()
    }

    /// Projection of `self` onto `normal`; zero when `normal` is degenerate.
    pub fn project(self, normal: Self) -> Self {
        let sqr = normal.sqr_magnitude();
        if sqr <= NORMALIZE_EPSILON {
            return Self::ZERO;
        }
        normal * (self.dot(normal) / sqr)
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Lossy conversion to the engine's single-precision vector.
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl PartialEq for Vector3d {
    fn eq(&self, other: &Self) -> bool {
        (*self - *other).sqr_magnitude() < EQUALITY_EPSILON_SQR
    }
}

impl fmt::Display for Vector3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vector3d {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3d {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3d {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3d {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3d> for f64 {
    type Output = Vector3d;

    fn mul(self, rhs: Vector3d) -> Vector3d {
        rhs * self
    }
}

impl Div<f64> for Vector3d {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl AddAssign for Vector3d {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3d {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f64> for Vector3d {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl DivAssign<f64> for Vector3d {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Vector3d {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3d index out of range: {index}"),
        }
    }
}

impl From<DVec3> for Vector3d {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3d> for DVec3 {
    fn from(v: Vector3d) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3d {
    fn from(v: Vec3) -> Self {
        Self::new(v.x as f64, v.y as f64, v.z as f64)
    }
}

impl From<Vector3d> for Vec3 {
    fn from(v: Vector3d) -> Self {
        v.as_vec3()
    }
}
