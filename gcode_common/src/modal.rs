//! Modal parser state.
//!
//! `ModalState` is the machine state the line parser maintains between
//! commands. The current point is always absolute, whatever the active
//! distance mode. Processors receive a copy and must never write back.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::units::Units;

// ─── Modal groups ───────────────────────────────────────────────────

/// Active motion mode (modal group 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum MotionMode {
    /// G0.
    #[default]
    Rapid = 0,
    /// G1.
    Linear = 1,
    /// G2.
    ArcCw = 2,
    /// G3.
    ArcCcw = 3,
}

impl MotionMode {
    pub const fn gcode(&self) -> &'static str {
        match self {
            Self::Rapid => "G0",
            Self::Linear => "G1",
            Self::ArcCw => "G2",
            Self::ArcCcw => "G3",
        }
    }
}

/// Distance mode (modal group 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum DistanceMode {
    /// G90.
    #[default]
    Absolute = 0,
    /// G91.
    Relative = 1,
}

impl DistanceMode {
    pub const fn gcode(&self) -> &'static str {
        match self {
            Self::Absolute => "G90",
            Self::Relative => "G91",
        }
    }

    #[inline]
    pub const fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute)
    }
}

/// Feed rate mode (modal group 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum FeedMode {
    /// G93.
    InverseTime = 0,
    /// G94.
    #[default]
    UnitsPerMinute = 1,
    /// G95.
    UnitsPerRevolution = 2,
}

impl FeedMode {
    pub const fn gcode(&self) -> &'static str {
        match self {
            Self::InverseTime => "G93",
            Self::UnitsPerMinute => "G94",
            Self::UnitsPerRevolution => "G95",
        }
    }
}

/// Active arc plane (modal group 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum Plane {
    /// G17.
    #[default]
    XY = 0,
    /// G18.
    ZX = 1,
    /// G19.
    YZ = 2,
}

impl Plane {
    pub const fn gcode(&self) -> &'static str {
        match self {
            Self::XY => "G17",
            Self::ZX => "G18",
            Self::YZ => "G19",
        }
    }
}

macro_rules! display_gcode {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.gcode())
            }
        })*
    };
}

display_gcode!(MotionMode, DistanceMode, FeedMode, Plane);

// ─── ModalState ─────────────────────────────────────────────────────

/// Snapshot of the parser's modal state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModalState {
    /// Absolute position after the last executed command.
    pub current_point: Position,
    pub motion_mode: MotionMode,
    pub distance_mode: DistanceMode,
    pub feed_mode: FeedMode,
    /// Last programmed F word, in `units` per the feed mode.
    pub feed_rate: f64,
    pub units: Units,
    pub plane: Plane,
}

impl ModalState {
    /// Power-on state in the given units.
    pub const fn new(units: Units) -> Self {
        Self {
            current_point: Position::zero_in(units),
            motion_mode: MotionMode::Rapid,
            distance_mode: DistanceMode::Absolute,
            feed_mode: FeedMode::UnitsPerMinute,
            feed_rate: 0.0,
            units,
            plane: Plane::XY,
        }
    }

    #[inline]
    pub const fn in_absolute_mode(&self) -> bool {
        self.distance_mode.is_absolute()
    }
}

impl Default for ModalState {
    fn default() -> Self {
        Self::new(Units::Mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_power_on_state() {
        let s = ModalState::default();
        assert_eq!(s.current_point, Position::ZERO);
        assert_eq!(s.motion_mode, MotionMode::Rapid);
        assert!(s.in_absolute_mode());
        assert_eq!(s.feed_mode, FeedMode::UnitsPerMinute);
        assert_eq!(s.feed_rate, 0.0);
        assert_eq!(s.units, Units::Mm);
        assert_eq!(s.plane, Plane::XY);
    }

    #[test]
    fn modes_display_as_gcode() {
        assert_eq!(MotionMode::Linear.to_string(), "G1");
        assert_eq!(DistanceMode::Relative.to_string(), "G91");
        assert_eq!(FeedMode::InverseTime.to_string(), "G93");
        assert_eq!(Plane::ZX.to_string(), "G18");
    }

    #[test]
    fn state_is_copied_not_shared() {
        let original = ModalState::default();
        let mut copy = original;
        copy.current_point.x = 10.0;
        copy.distance_mode = DistanceMode::Relative;
        assert_eq!(original.current_point.x, 0.0);
        assert!(original.in_absolute_mode());
    }
}
