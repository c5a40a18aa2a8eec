//! # G-code Processor Library
//!
//! Stateful transformers that sit between a G-code program and the motion
//! controller. Each stage receives one raw line plus the modal state in
//! effect before it and returns the lines to send instead.
//!
//! ## Modules
//!
//! - [`processor`] - The `CommandProcessor` contract every stage implements
//! - [`backlash`] - Backlash compensation stage
//! - [`parser`] - Line parser producing command records and modal state
//! - [`format`] - Line-text regeneration helpers
//! - [`config`] - Stage and binary configuration
//! - [`error`] - Processing and parse errors
//!
//! ## Example
//!
//! ```rust
//! use gcode_common::modal::ModalState;
//! use gcode_processor::backlash::BacklashCompensationProcessor;
//! use gcode_processor::config::BacklashConfig;
//! use gcode_processor::processor::CommandProcessor;
//!
//! let config = BacklashConfig::new([0.1, 0.0, 0.0], [1.0, 0.0, 0.0], 500.0);
//! let mut stage = BacklashCompensationProcessor::new(config).unwrap();
//! stage.reset();
//! let lines = stage.process("G1 X-5", &ModalState::default()).unwrap();
//! assert_eq!(lines.last().unwrap(), "G1 X-5.1");
//! ```

pub mod backlash;
pub mod config;
pub mod error;
pub mod format;
pub mod parser;
pub mod processor;
