//! Measurement units and pairwise linear scale factors.
//!
//! Conversion between unit systems is a pure multiplicative factor; there are
//! no offsets. `Unknown` converts to and from everything with a factor of 1.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::consts::MM_PER_INCH;

/// Measurement system of a position or program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Units {
    /// Metric (G21).
    #[default]
    Mm = 0,
    /// Imperial (G20).
    Inch = 1,
    /// Not known; never scaled.
    Unknown = 2,
}

impl Units {
    /// Unit-selection G word, `None` for `Unknown`.
    pub const fn gcode(&self) -> Option<&'static str> {
        match self {
            Self::Mm => Some("G21"),
            Self::Inch => Some("G20"),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm => write!(f, "mm"),
            Self::Inch => write!(f, "inch"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Units {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mm" => Ok(Self::Mm),
            "inch" => Ok(Self::Inch),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("unknown Units: {s:?}")),
        }
    }
}

/// Factor that converts a length in `from` into `to`.
///
/// `scale_units(a, a) == 1.0` for every unit and any pair involving
/// `Unknown` is 1.0.
#[inline]
pub const fn scale_units(from: Units, to: Units) -> f64 {
    match (from, to) {
        (Units::Mm, Units::Inch) => 1.0 / MM_PER_INCH,
        (Units::Inch, Units::Mm) => MM_PER_INCH,
        _ => 1.0,
    }
}
