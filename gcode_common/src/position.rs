//! Unit-tagged six-axis position.
//!
//! `Position` is the coordinate value used throughout the processors. All
//! mutators (`set`, `add`, `sub`, ...) work in place on an owned value and
//! return `&mut Self` for chaining; conversions and rotation return new
//! values and never touch the receiver.
//!
//! Rotational axes (A, B, C) are angles and are never unit-scaled, neither
//! by [`Position::get_position_in`] nor by the arithmetic operations.

use core::fmt;
use core::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::point::{CoordinatePoint, axis_eq};
use crate::units::{Units, scale_units};

/// Six-axis position with a unit tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    units: Units,
}

impl Position {
    /// All axes zero, metric.
    pub const ZERO: Self = Self::full(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, Units::Mm);

    /// All axes unset, metric.
    pub const INVALID: Self = Self::full(
        f64::NAN,
        f64::NAN,
        f64::NAN,
        f64::NAN,
        f64::NAN,
        f64::NAN,
        Units::Mm,
    );

    /// Linear position; rotational axes unset.
    pub const fn new(x: f64, y: f64, z: f64, units: Units) -> Self {
        Self::full(x, y, z, f64::NAN, f64::NAN, f64::NAN, units)
    }

    pub const fn full(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64, units: Units) -> Self {
        Self {
            x,
            y,
            z,
            a,
            b,
            c,
            units,
        }
    }

    /// All axes zero in the given units.
    pub const fn zero_in(units: Units) -> Self {
        Self::full(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, units)
    }

    pub const fn from_point(point: CoordinatePoint, units: Units) -> Self {
        Self::full(point.x, point.y, point.z, point.a, point.b, point.c, units)
    }

    /// The untagged coordinates.
    pub const fn point(&self) -> CoordinatePoint {
        CoordinatePoint::new(self.x, self.y, self.z, self.a, self.b, self.c)
    }

    #[inline]
    pub const fn units(&self) -> Units {
        self.units
    }

    /// Same coordinates re-tagged with `units`, without scaling.
    pub const fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
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

    /// Compare coordinates after converting `other` into this position's units.
    pub fn is_same_position_ignoring_units(&self, other: &Position) -> bool {
        if self.units != other.units {
            return *self == other.get_position_in(self.units);
        }
        self == other
    }

    /// Convert into `units`. Only the linear axes are scaled.
    pub fn get_position_in(&self, units: Units) -> Position {
        let scale = scale_units(self.units, units);
        Position::full(
            self.x * scale,
            self.y * scale,
            self.z * scale,
            self.a,
            self.b,
            self.c,
            units,
        )
    }

    /// Rotate the XY pair clockwise by `radians` around `center`'s XY.
    ///
    /// Z and the rotational axes pass through unchanged.
    pub fn rotate(&self, center: &Position, radians: f64) -> Position {
        let (sin, cos) = radians.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Position::full(
            center.x + (cos * dx + sin * dy),
            center.y + (-sin * dx + cos * dy),
            self.z,
            self.a,
            self.b,
            self.c,
            self.units,
        )
    }

    /// True if reaching `next` only requires Z motion (a plunge or retract).
    pub fn is_z_motion_to(&self, next: &Position) -> bool {
        !axis_eq(self.z, next.z)
            && axis_eq(self.x, next.x)
            && axis_eq(self.y, next.y)
            && axis_eq(self.a, next.a)
            && axis_eq(self.b, next.b)
            && axis_eq(self.c, next.c)
    }

    /// True if any rotational axis differs between `self` and `next`.
    pub fn has_rotation_to(&self, next: &Position) -> bool {
        Axis::ROTATIONAL
            .iter()
            .any(|a| !axis_eq(self.get(*a), next.get(*a)))
    }

    /// True if any rotational axis is set and nonzero.
    pub fn has_rotation(&self) -> bool {
        Axis::ROTATIONAL.iter().any(|a| {
            let v = self.get(*a);
            !v.is_nan() && v != 0.0
        })
    }

    /// Add `other`, converted into this position's units, axis by axis.
    pub fn add(&mut self, other: &Position) -> &mut Self {
        self.combine(other, 1.0)
    }

    /// Subtract `other`, converted into this position's units, axis by axis.
    pub fn sub(&mut self, other: &Position) -> &mut Self {
        self.combine(other, -1.0)
    }

    /// Add `amount` (expressed in `amount_units`) to a single axis.
    pub fn add_axis(&mut self, axis: Axis, amount: f64, amount_units: Units) -> &mut Self {
        let delta = if axis.is_linear() {
            amount * scale_units(amount_units, self.units)
        } else {
            amount
        };
        let value = self.get(axis) + delta;
        self.set(axis, value)
    }

    /// Subtract `amount` (expressed in `amount_units`) from a single axis.
    pub fn sub_axis(&mut self, axis: Axis, amount: f64, amount_units: Units) -> &mut Self {
        self.add_axis(axis, -amount, amount_units)
    }

    fn combine(&mut self, other: &Position, sign: f64) -> &mut Self {
        let scale = scale_units(other.units, self.units);
        for axis in Axis::ALL {
            let factor = if axis.is_linear() { scale } else { 1.0 };
            let value = self.get(axis) + sign * other.get(axis) * factor;
            self.set(axis, value);
        }
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.units == other.units && self.point() == other.point()
    }
}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.units.hash(state);
        self.point().hash(state);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}, {}, {} {}]",
            self.x, self.y, self.z, self.a, self.b, self.c, self.units
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::f64::consts::FRAC_PI_2;

    fn hash_of(p: &Position) -> u64 {
        let mut h = DefaultHasher::new();
        p.hash(&mut h);
        h.finish()
    }

    #[test]
    fn sentinels_equal_themselves() {
        assert_eq!(Position::ZERO, Position::ZERO);
        assert_eq!(Position::INVALID, Position::INVALID);
        assert_ne!(Position::ZERO, Position::INVALID);
    }

    #[test]
    fn equality_requires_same_units() {
        let mm = Position::new(1.0, 2.0, 3.0, Units::Mm);
        let inch = Position::new(1.0, 2.0, 3.0, Units::Inch);
        assert_ne!(mm, inch);
    }

    #[test]
    fn equal_positions_hash_equal() {
        let p = Position::new(1.0, 2.0, 3.0, Units::Mm);
        let q = Position::new(1.0 + 1e-7, 2.0, 3.0, Units::Mm);
        assert_eq!(p, q);
        assert_eq!(hash_of(&p), hash_of(&q));
    }

    #[test]
    fn same_position_ignoring_units_converts_other() {
        let mm = Position::new(25.4, 50.8, 0.0, Units::Mm);
        let inch = Position::new(1.0, 2.0, 0.0, Units::Inch);
        assert!(mm.is_same_position_ignoring_units(&inch));
        assert!(inch.is_same_position_ignoring_units(&mm));
        assert!(!mm.is_same_position_ignoring_units(&Position::new(1.0, 2.0, 1.0, Units::Inch)));
    }

    #[test]
    fn conversion_leaves_rotation_untouched() {
        let p = Position::full(25.4, 0.0, -12.7, 90.0, 45.0, 1.5, Units::Mm);
        let q = p.get_position_in(Units::Inch);
        assert!((q.x - 1.0).abs() < 1e-12);
        assert!((q.z + 0.5).abs() < 1e-12);
        assert_eq!(q.a.to_bits(), p.a.to_bits());
        assert_eq!(q.b.to_bits(), p.b.to_bits());
        assert_eq!(q.c.to_bits(), p.c.to_bits());
        assert_eq!(q.units(), Units::Inch);
    }

    #[test]
    fn conversion_roundtrip() {
        let p = Position::full(12.3, -4.5, 6.78, 10.0, 20.0, 30.0, Units::Mm);
        for (u1, u2) in [
            (Units::Inch, Units::Mm),
            (Units::Mm, Units::Inch),
            (Units::Inch, Units::Inch),
            (Units::Mm, Units::Mm),
        ] {
            let back = p.get_position_in(u1).get_position_in(u2).get_position_in(p.units());
            assert_eq!(back, p);
        }
    }

    #[test]
    fn rotate_by_zero_is_identity() {
        let p = Position::new(3.0, 4.0, 5.0, Units::Mm);
        let center = Position::new(1.0, 1.0, 0.0, Units::Mm);
        assert_eq!(p.rotate(&center, 0.0), p);
    }

    #[test]
    fn rotate_is_clockwise() {
        let p = Position::new(1.0, 0.0, 0.0, Units::Mm);
        let r = p.rotate(&Position::ZERO, FRAC_PI_2);
        assert!((r.x - 0.0).abs() < 1e-9);
        assert!((r.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn rotate_there_and_back() {
        let p = Position::full(3.0, -7.0, 2.0, 15.0, 0.0, 5.0, Units::Inch);
        let center = Position::new(-1.0, 2.5, 0.0, Units::Inch);
        let back = p.rotate(&center, 0.7).rotate(&center, -0.7);
        assert_eq!(back, p);
        let once = p.rotate(&center, 0.7);
        assert_eq!(once.z, p.z);
        assert_eq!((once.a, once.b, once.c), (p.a, p.b, p.c));
        // Receiver untouched.
        assert_eq!(p.x, 3.0);
    }

    #[test]
    fn z_motion_detection() {
        let start = Position::new(0.0, 0.0, 0.0, Units::Mm);
        assert!(start.is_z_motion_to(&Position::new(0.0, 0.0, 5.0, Units::Mm)));
        assert!(!start.is_z_motion_to(&Position::new(1.0, 0.0, 5.0, Units::Mm)));
        assert!(!start.is_z_motion_to(&start));
    }

    #[test]
    fn rotation_detection() {
        assert!(!Position::ZERO.has_rotation());
        assert!(!Position::INVALID.has_rotation());
        assert!(Position::full(0.0, 0.0, 0.0, 0.0, 0.0, 2.0, Units::Mm).has_rotation());

        let p = Position::ZERO;
        assert!(!p.has_rotation_to(&Position::ZERO));
        for axis in Axis::ROTATIONAL {
            let mut q = Position::ZERO;
            q.set(axis, 1.0);
            assert!(p.has_rotation_to(&q), "{axis} change not detected");
        }
        let mut linear_only = Position::ZERO;
        linear_only.set(Axis::X, 10.0);
        assert!(!p.has_rotation_to(&linear_only));
    }

    #[test]
    fn add_scales_linear_axes_only() {
        let mut p = Position::full(10.0, 0.0, 0.0, 5.0, 0.0, 0.0, Units::Mm);
        let q = Position::full(1.0, 1.0, 0.0, 5.0, 0.0, 0.0, Units::Inch);
        p.add(&q);
        assert!((p.x - 35.4).abs() < 1e-9);
        assert!((p.y - 25.4).abs() < 1e-9);
        assert_eq!(p.a, 10.0);
        assert_eq!(p.units(), Units::Mm);
    }

    #[test]
    fn sub_inverts_add() {
        let original = Position::full(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, Units::Mm);
        let delta = Position::full(0.5, -0.25, 1.0, 2.0, 0.0, -1.0, Units::Inch);
        let mut p = original;
        p.add(&delta).sub(&delta);
        assert_eq!(p, original);
    }

    #[test]
    fn add_axis_scales_amount() {
        let mut p = Position::new(0.0, 0.0, 0.0, Units::Mm);
        p.add_axis(Axis::X, 1.0, Units::Inch).add_axis(Axis::Y, 2.0, Units::Mm);
        assert!((p.x - 25.4).abs() < 1e-9);
        assert_eq!(p.y, 2.0);
        p.sub_axis(Axis::Y, 2.0, Units::Mm);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn unknown_units_add_unscaled() {
        let mut p = Position::new(1.0, 1.0, 1.0, Units::Inch);
        let mut comp = Position::zero_in(Units::Unknown);
        comp.set(Axis::X, 0.1);
        p.add(&comp);
        assert!((p.x - 1.1).abs() < 1e-12);
    }

    #[test]
    fn display_includes_units() {
        let s = Position::new(1.0, 2.0, 3.0, Units::Inch).to_string();
        assert!(s.starts_with("[1, 2, 3"));
        assert!(s.ends_with("inch]"));
    }
}
