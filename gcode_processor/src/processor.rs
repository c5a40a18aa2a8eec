//! Command-processor contract.
//!
//! Every pipeline stage implements [`CommandProcessor`]. The driver feeds
//! lines strictly in program order and calls [`CommandProcessor::reset`]
//! before the first line of every job. A processor instance belongs to one
//! job at a time: `process` and `reset` take `&mut self`, so sharing an
//! instance between concurrent jobs does not compile without external
//! locking, and each job should own its own instance instead.

use gcode_common::modal::ModalState;

use crate::error::ProcessingError;

pub trait CommandProcessor {
    /// Rewrite one raw line.
    ///
    /// `state` is the modal state in effect just before the line executes.
    /// The returned lines, in order, must have the same physical effect as
    /// the input line plus the stage's intentional changes. On error nothing
    /// is emitted for the line and the processor state is left unchanged.
    fn process(&mut self, line: &str, state: &ModalState) -> Result<Vec<String>, ProcessingError>;

    /// Clear all cross-line state before a new job.
    fn reset(&mut self);

    /// Human-readable description of the stage.
    fn describe(&self) -> &'static str;
}
