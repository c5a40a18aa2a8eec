//! Machine axes.
//!
//! `Axis` is a closed enumeration: three linear axes (X, Y, Z) followed by
//! three rotational axes (A, B, C). Every match over it is exhaustive.
//! `AxisSet` is a compact bitflag set of axes.

use bitflags::bitflags;
use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the six machine axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
    A = 3,
    B = 4,
    C = 5,
}

impl Axis {
    /// All axes in word order.
    pub const ALL: [Axis; 6] = [Self::X, Self::Y, Self::Z, Self::A, Self::B, Self::C];

    /// The linear axes.
    pub const LINEAR: [Axis; 3] = [Self::X, Self::Y, Self::Z];

    /// The rotational axes.
    pub const ROTATIONAL: [Axis; 3] = [Self::A, Self::B, Self::C];

    #[inline]
    pub const fn is_linear(&self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z)
    }

    #[inline]
    pub const fn is_rotational(&self) -> bool {
        !self.is_linear()
    }

    /// Upper-case G-code word letter for this axis.
    pub const fn letter(&self) -> char {
        match self {
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }

    /// Parse a word letter (either case). Returns `None` for non-axis letters.
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            _ => None,
        }
    }

    /// The single-axis flag for this axis.
    #[inline]
    pub const fn flag(&self) -> AxisSet {
        AxisSet::from_bits_truncate(1 << (*self as u8))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

bitflags! {
    /// Set of machine axes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxisSet: u8 {
        const X = 0x01;
        const Y = 0x02;
        const Z = 0x04;
        const A = 0x08;
        const B = 0x10;
        const C = 0x20;
    }
}

impl AxisSet {
    /// Mask of the linear axes.
    pub const LINEAR: Self = Self::from_bits_truncate(0x07);

    /// Mask of the rotational axes.
    pub const ROTATIONAL: Self = Self::from_bits_truncate(0x38);

    #[inline]
    pub const fn has(&self, axis: Axis) -> bool {
        self.contains(axis.flag())
    }

    /// Iterate the member axes in word order.
    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|a| self.has(*a))
    }
}
