//! Sparse six-axis position.
//!
//! Each axis is explicitly present or absent; absence is never encoded as
//! NaN. A `PartialPosition` only describes which axis words of a line to
//! rewrite, it takes no part in arithmetic.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::consts::AXIS_COUNT;
use crate::units::Units;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialPosition {
    values: [Option<f64>; AXIS_COUNT],
    units: Units,
}

impl PartialPosition {
    /// No axes present.
    pub const fn new(units: Units) -> Self {
        Self {
            values: [None; AXIS_COUNT],
            units,
        }
    }

    /// Builder-style setter.
    pub const fn with(mut self, axis: Axis, value: f64) -> Self {
        self.values[axis as usize] = Some(value);
        self
    }

    pub fn set(&mut self, axis: Axis, value: f64) -> &mut Self {
        self.values[axis as usize] = Some(value);
        self
    }

    pub fn clear(&mut self, axis: Axis) -> &mut Self {
        self.values[axis as usize] = None;
        self
    }

    #[inline]
    pub const fn get(&self, axis: Axis) -> Option<f64> {
        self.values[axis as usize]
    }

    #[inline]
    pub const fn units(&self) -> Units {
        self.units
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Present axes and their values in word order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL
            .into_iter()
            .filter_map(|a| self.get(a).map(|v| (a, v)))
    }
}
