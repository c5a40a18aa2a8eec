//! Dense six-axis coordinate value.
//!
//! An unset axis is encoded as NaN. Equality is per axis within
//! [`EPSILON`]; NaN on both sides of the same axis counts as equal, any
//! other comparison involving NaN is unequal.

use core::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::axis::Axis;
use crate::consts::EPSILON;

/// Six-axis point without a unit tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoordinatePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

const_assert_eq!(core::mem::size_of::<CoordinatePoint>(), 48);

/// Tolerant scalar comparison with the NaN == NaN convention.
#[inline]
pub fn axis_eq(lhs: f64, rhs: f64) -> bool {
    if lhs.is_nan() || rhs.is_nan() {
        return lhs.is_nan() && rhs.is_nan();
    }
    (lhs - rhs).abs() < EPSILON
}

impl CoordinatePoint {
    /// All axes zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    /// All axes unset.
    pub const INVALID: Self = Self::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN);

    pub const fn new(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64) -> Self {
        Self { x, y, z, a, b, c }
    }

    /// Linear axes set, rotational axes unset.
    pub const fn linear(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, f64::NAN, f64::NAN, f64::NAN)
    }

    #[inline]
    pub const fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::A => self.a,
            Axis::B => self.b,
            Axis::C => self.c,
        }
    }

    /// Set one axis in place; returns `self` for chaining.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: f64) -> &mut Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
            Axis::A => self.a = value,
            Axis::B => self.b = value,
            Axis::C => self.c = value,
        }
        self
    }

    /// True if `axis` holds a value (is not NaN).
    #[inline]
    pub fn is_set(&self, axis: Axis) -> bool {
        !self.get(axis).is_nan()
    }

    /// Bitmask of NaN axes, bit `n` for `Axis` discriminant `n`.
    pub fn nan_mask(&self) -> u8 {
        Axis::ALL
            .iter()
            .filter(|a| !self.is_set(**a))
            .fold(0u8, |mask, a| mask | (1 << (*a as u8)))
    }
}

impl Default for CoordinatePoint {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for CoordinatePoint {
    fn eq(&self, other: &Self) -> bool {
        Axis::ALL.iter().all(|a| axis_eq(self.get(*a), other.get(*a)))
    }
}

// Tolerant equality can only agree with a hash of what it compares exactly.
impl Hash for CoordinatePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nan_mask().hash(state);
    }
}
