//! G-code Common Library
//!
//! Shared types for every crate in the G-code processing workspace: the
//! unit system, the six-axis coordinate model, the modal parser state and
//! parsed command records, plus configuration loading utilities.
//!
//! # Module Structure
//!
//! - [`units`] - Measurement units and linear scale factors
//! - [`axis`] - The closed set of machine axes
//! - [`point`] - Dense six-axis coordinate value
//! - [`position`] - Unit-tagged position with arithmetic and conversion
//! - [`partial`] - Sparse position used to regenerate touched axis words
//! - [`modal`] - Modal parser state (distance, feed and motion modes)
//! - [`command`] - Parsed command records
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use gcode_common::prelude::*;
//!
//! let p = Position::new(25.4, 0.0, 0.0, Units::Mm);
//! assert_eq!(p.get_position_in(Units::Inch).x, 1.0);
//! ```

pub mod axis;
pub mod command;
pub mod config;
pub mod consts;
pub mod modal;
pub mod partial;
pub mod point;
pub mod position;
pub mod prelude;
pub mod units;
