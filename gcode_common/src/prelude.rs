//! Prelude module for common re-exports.
//!
//! `use gcode_common::prelude::*;` brings in the coordinate model, modal
//! state and configuration types without listing individual paths.

// ─── Coordinates ────────────────────────────────────────────────────
pub use crate::axis::{Axis, AxisSet};
pub use crate::partial::PartialPosition;
pub use crate::point::CoordinatePoint;
pub use crate::position::Position;
pub use crate::units::{Units, scale_units};

// ─── Parser state ───────────────────────────────────────────────────
pub use crate::command::{Code, CommandRecord};
pub use crate::modal::{DistanceMode, FeedMode, ModalState, MotionMode, Plane};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, MachineConfig};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{DECIMAL_PLACES, EPSILON};
