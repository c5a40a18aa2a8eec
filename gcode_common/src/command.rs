//! Parsed command records.
//!
//! The line parser turns one raw line into zero or more [`CommandRecord`]s
//! in execution order. Processors only consume records.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::modal::{MotionMode, ModalState};
use crate::position::Position;

/// Command word recognized by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Code {
    /// Rapid move.
    G0,
    /// Linear (feed) move.
    G1,
    /// Clockwise arc.
    G2,
    /// Counter-clockwise arc.
    G3,
    /// Dwell.
    G4,
    G17,
    G18,
    G19,
    G20,
    G21,
    G90,
    G91,
    G93,
    G94,
    G95,
    /// Any M word (spindle, coolant, program control).
    M(u16),
    /// Unrecognized G word, kept verbatim.
    Unknown(String),
}

impl Code {
    /// Map a G word number (as written, e.g. `"01"`, `"38.2"`) to a code.
    pub fn from_g(number: &str) -> Self {
        let known = match number.parse::<f64>() {
            Ok(n) if n >= 0.0 && n.fract() == 0.0 => match n as u32 {
                0 => Some(Self::G0),
                1 => Some(Self::G1),
                2 => Some(Self::G2),
                3 => Some(Self::G3),
                4 => Some(Self::G4),
                17 => Some(Self::G17),
                18 => Some(Self::G18),
                19 => Some(Self::G19),
                20 => Some(Self::G20),
                21 => Some(Self::G21),
                90 => Some(Self::G90),
                91 => Some(Self::G91),
                93 => Some(Self::G93),
                94 => Some(Self::G94),
                95 => Some(Self::G95),
                _ => None,
            },
            _ => None,
        };
        known.unwrap_or_else(|| Self::Unknown(format!("G{number}")))
    }

    /// Rapid or linear move.
    #[inline]
    pub const fn is_move(&self) -> bool {
        matches!(self, Self::G0 | Self::G1)
    }

    /// Circular or helical move.
    #[inline]
    pub const fn is_arc(&self) -> bool {
        matches!(self, Self::G2 | Self::G3)
    }

    /// The motion mode this code selects, if any.
    pub const fn motion_mode(&self) -> Option<MotionMode> {
        match self {
            Self::G0 => Some(MotionMode::Rapid),
            Self::G1 => Some(MotionMode::Linear),
            Self::G2 => Some(MotionMode::ArcCw),
            Self::G3 => Some(MotionMode::ArcCcw),
            _ => None,
        }
    }

    pub const fn from_motion(mode: MotionMode) -> Self {
        match mode {
            MotionMode::Rapid => Self::G0,
            MotionMode::Linear => Self::G1,
            MotionMode::ArcCw => Self::G2,
            MotionMode::ArcCcw => Self::G3,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::G0 => f.write_str("G0"),
            Self::G1 => f.write_str("G1"),
            Self::G2 => f.write_str("G2"),
            Self::G3 => f.write_str("G3"),
            Self::G4 => f.write_str("G4"),
            Self::G17 => f.write_str("G17"),
            Self::G18 => f.write_str("G18"),
            Self::G19 => f.write_str("G19"),
            Self::G20 => f.write_str("G20"),
            Self::G21 => f.write_str("G21"),
            Self::G90 => f.write_str("G90"),
            Self::G91 => f.write_str("G91"),
            Self::G93 => f.write_str("G93"),
            Self::G94 => f.write_str("G94"),
            Self::G95 => f.write_str("G95"),
            Self::M(n) => write!(f, "M{n}"),
            Self::Unknown(text) => f.write_str(text),
        }
    }
}

/// One parsed instruction of a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub code: Code,
    /// Absolute destination, `None` for commands without a target.
    pub point: Option<Position>,
    /// Modal state in effect once this command has executed.
    pub state: ModalState,
}

impl CommandRecord {
    pub fn new(code: Code, point: Option<Position>, state: ModalState) -> Self {
        Self { code, point, state }
    }

    #[inline]
    pub fn has_destination(&self) -> bool {
        self.point.is_some()
    }
}
