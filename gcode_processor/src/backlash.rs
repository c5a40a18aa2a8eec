//! Backlash compensation.
//!
//! Inserts motion so that, despite lost motion when a linear axis reverses,
//! the tool still reaches the commanded coordinate, and the controller's
//! last travel direction on every compensated axis is always known.
//!
//! ## Lifecycle
//!
//! 1. `reset()` → **Uninitialized**
//! 2. First line with a destination move → calibration block emitted,
//!    active compensation zeroed → **Initialized**
//! 3. Every destination move updates the active compensation per axis:
//!    unchanged if the axis does not move, `0` when it moves in the
//!    calibration direction, the signed backlash when it reverses
//! 4. A change is taken up by one extra move ahead of the line, written in
//!    the distance mode active before the line; absolute destinations are
//!    then offset by the active compensation, relative ones stay as written
//!
//! ## Output per input line
//!
//! `[calibration block] ++ [compensation move] ++ [original or rewritten line]`

use tracing::{debug, info, warn};

use gcode_common::axis::AxisSet;
use gcode_common::command::{Code, CommandRecord};
use gcode_common::config::ConfigError;
use gcode_common::consts::EPSILON;
use gcode_common::modal::{DistanceMode, FeedMode, ModalState};
use gcode_common::partial::PartialPosition;
use gcode_common::position::Position;
use gcode_common::units::Units;

use crate::config::BacklashConfig;
use crate::error::{ProcessingError, ProcessingErrorKind};
use crate::format::{format_decimal, generate_line_from_points, override_position};
use crate::parser::{GcodeLineParser, LineParser};
use crate::processor::CommandProcessor;

/// Number of lines in the calibration block.
pub const CALIBRATION_LINES: usize = 7;

/// Cross-line state owned by one job between two `reset()` calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensationState {
    initialized: bool,
    /// Per supported axis either 0 or the signed backlash. Tagged
    /// `Units::Unknown` so adding it to a machine position never scales it.
    active_compensation: Position,
}

impl CompensationState {
    pub const fn new() -> Self {
        Self {
            initialized: false,
            active_compensation: Position::zero_in(Units::Unknown),
        }
    }

    #[inline]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub const fn active_compensation(&self) -> &Position {
        &self.active_compensation
    }
}

impl Default for CompensationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Backlash-compensation stage.
#[derive(Debug, Clone)]
pub struct BacklashCompensationProcessor<P: LineParser = GcodeLineParser> {
    config: BacklashConfig,
    supported: AxisSet,
    parser: P,
    state: CompensationState,
}

impl BacklashCompensationProcessor<GcodeLineParser> {
    /// Build a processor with the default line parser.
    pub fn new(config: BacklashConfig) -> Result<Self, ConfigError> {
        Self::with_parser(config, GcodeLineParser)
    }
}

impl<P: LineParser> BacklashCompensationProcessor<P> {
    pub fn with_parser(config: BacklashConfig, parser: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            supported: config.supported_axes(),
            parser,
            state: CompensationState::new(),
        })
    }

    pub fn config(&self) -> &BacklashConfig {
        &self.config
    }

    /// Axes with nonzero backlash.
    pub fn supported_axes(&self) -> AxisSet {
        self.supported
    }

    pub fn state(&self) -> &CompensationState {
        &self.state
    }

    /// The 7-line net-zero calibration block.
    ///
    /// `state` is the modal state immediately before the block; its last
    /// line restores it.
    pub fn calibration_block(&self, state: &ModalState) -> [String; CALIBRATION_LINES] {
        let c = &self.config;
        [
            format!("{} {}", DistanceMode::Relative, FeedMode::UnitsPerMinute),
            format!("{} F{}", Code::G1, format_decimal(c.feed_rate)),
            format!("{} Z{}", Code::G1, format_decimal(c.initial_z)),
            format!(
                "{} X{} Y{}",
                Code::G1,
                format_decimal(c.initial_x),
                format_decimal(c.initial_y)
            ),
            format!(
                "{} X{} Y{}",
                Code::G1,
                format_decimal(-c.initial_x),
                format_decimal(-c.initial_y)
            ),
            format!("{} Z{}", Code::G1, format_decimal(-c.initial_z)),
            format!(
                "{} {} {} F{}",
                state.motion_mode,
                state.distance_mode,
                state.feed_mode,
                format_decimal(state.feed_rate)
            ),
        ]
    }

    /// New compensation after moving from `start` to `end`.
    fn update_compensation(
        &self,
        prior: &Position,
        start: &Position,
        end: &Position,
    ) -> Result<Position, ProcessingErrorKind> {
        let mut compensation = *prior;
        for axis in self.supported.axes() {
            let (from, to) = (start.get(axis), end.get(axis));
            if !from.is_finite() || !to.is_finite() {
                return Err(ProcessingErrorKind::Internal(format!(
                    "non-finite {axis} coordinate in move {from} -> {to}"
                )));
            }
            let movement = to - from;
            if movement.abs() < EPSILON {
                continue;
            }
            let value = if movement.signum() == self.config.calibration_direction(axis) {
                0.0
            } else {
                self.config.signed_backlash(axis)
            };
            compensation.set(axis, value);
        }
        Ok(compensation)
    }

    /// Output lines for a line that needs processing. Works on `scratch`,
    /// which the caller commits only on success.
    fn rewrite(
        &self,
        line: &str,
        state: &ModalState,
        commands: &[CommandRecord],
        scratch: &mut CompensationState,
    ) -> Result<Vec<String>, ProcessingErrorKind> {
        let mut output = Vec::new();
        let mut rewritten = line.to_string();
        let mut destination_seen = false;

        for command in commands {
            if let Code::Unknown(text) = &command.code {
                return Err(ProcessingErrorKind::UnknownCommand(text.clone()));
            }
            let Some(end) = command.point else {
                continue;
            };
            if destination_seen {
                return Err(ProcessingErrorKind::MultipleDestinations);
            }
            destination_seen = true;

            if !scratch.initialized {
                info!(
                    feed_rate = self.config.feed_rate,
                    "Injecting backlash calibration block"
                );
                scratch.initialized = true;
                output.extend(self.calibration_block(state));
                scratch.active_compensation = Position::zero_in(Units::Unknown);
            }

            // The line may switch units; compare in the destination's units.
            let start = state.current_point.get_position_in(end.units());
            let mode = command.state.distance_mode;
            debug!(code = %command.code, %start, %end, %mode, "Process move");

            let prior = scratch.active_compensation;
            let active = self.update_compensation(&prior, &start, &end)?;
            scratch.active_compensation = active;

            if prior != active {
                let mut change = active;
                change.sub(&prior);
                info!(%change, "Add backlash compensation");
                let mut slack = compensation_move(&command.code, state, &prior, &active);
                // A feed move ahead of the line's own F word would run at the old rate.
                let feed = command.state.feed_rate;
                if command.code == Code::G1 && feed != state.feed_rate {
                    slack.push_str(&format!(" F{}", format_decimal(feed)));
                }
                output.push(slack);
            }

            // Relative destinations are already correct; only absolute ones move.
            if mode.is_absolute() {
                let mut adjusted = PartialPosition::new(end.units());
                for axis in self.supported.axes() {
                    let offset = active.get(axis);
                    if offset != 0.0 {
                        adjusted.set(axis, end.get(axis) + offset);
                    }
                }
                if !adjusted.is_empty() {
                    debug!(%active, "Adjust destination by active compensation");
                    rewritten = override_position(line, &adjusted);
                }
            }
        }

        output.push(rewritten);
        Ok(output)
    }
}

/// Slack-taking move from `prior` to `active` compensation.
///
/// Encoded in the distance mode in effect before the line, since it runs
/// ahead of any mode word on the line itself.
fn compensation_move(
    code: &Code,
    state: &ModalState,
    prior: &Position,
    active: &Position,
) -> String {
    match state.distance_mode {
        DistanceMode::Absolute => {
            let mut from = state.current_point;
            from.add(prior);
            let mut to = state.current_point;
            to.add(active);
            generate_line_from_points(code, &from, &to, DistanceMode::Absolute)
        }
        DistanceMode::Relative => {
            let mut delta = *active;
            delta.sub(prior);
            generate_line_from_points(
                code,
                &Position::zero_in(Units::Unknown),
                &delta,
                DistanceMode::Relative,
            )
        }
    }
}

/// True if the line has a rapid or linear move. Arcs are rejected outright.
fn needs_processing(commands: &[CommandRecord]) -> Result<bool, ProcessingErrorKind> {
    if commands.iter().any(|c| c.code.is_arc()) {
        return Err(ProcessingErrorKind::UnsupportedArc);
    }
    Ok(commands.iter().any(|c| c.code.is_move()))
}

impl<P: LineParser> CommandProcessor for BacklashCompensationProcessor<P> {
    fn process(&mut self, line: &str, state: &ModalState) -> Result<Vec<String>, ProcessingError> {
        let fail = |kind: ProcessingErrorKind| {
            warn!(line, error = %kind, "Backlash compensation failed");
            ProcessingError::new(line, kind)
        };

        let commands = self
            .parser
            .parse(line, state)
            .map_err(|e| fail(e.into()))?;
        if !needs_processing(&commands).map_err(fail)? {
            return Ok(vec![line.to_string()]);
        }

        let mut scratch = self.state;
        let output = self
            .rewrite(line, state, &commands, &mut scratch)
            .map_err(fail)?;
        self.state = scratch;
        Ok(output)
    }

    fn reset(&mut self) {
        self.state = CompensationState::new();
    }

    fn describe(&self) -> &'static str {
        "Insert moves to compensate for machine backlash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcode_common::axis::Axis;
    use gcode_common::modal::MotionMode;

    fn processor() -> BacklashCompensationProcessor {
        let config = BacklashConfig::new([0.1, 0.0, 0.0], [1.0, 0.0, 0.0], 500.0);
        let mut p = BacklashCompensationProcessor::new(config).unwrap();
        p.reset();
        p
    }

    fn at_x(x: f64, mode: DistanceMode) -> ModalState {
        let mut state = ModalState::default();
        state.current_point.set(Axis::X, x);
        state.distance_mode = mode;
        state.motion_mode = MotionMode::Linear;
        state.feed_rate = 800.0;
        state
    }

    #[test]
    fn calibration_block_layout() {
        let config = BacklashConfig::new([0.1, 0.1, 0.1], [1.0, -2.0, 3.0], 500.0);
        let p = BacklashCompensationProcessor::new(config).unwrap();
        let block = p.calibration_block(&at_x(0.0, DistanceMode::Absolute));
        assert_eq!(
            block,
            [
                "G91 G94",
                "G1 F500",
                "G1 Z3",
                "G1 X1 Y-2",
                "G1 X-1 Y2",
                "G1 Z-3",
                "G1 G90 G94 F800",
            ]
        );
    }

    #[test]
    fn first_move_initializes() {
        let mut p = processor();
        assert!(!p.state().is_initialized());
        let out = p.process("G1 X5", &at_x(0.0, DistanceMode::Absolute)).unwrap();
        assert!(p.state().is_initialized());
        assert_eq!(out.len(), CALIBRATION_LINES + 1);
        assert_eq!(out.last().unwrap(), "G1 X5");
    }

    #[test]
    fn non_move_lines_pass_through_before_init() {
        let mut p = processor();
        for line in ["G21", "M3 S1000", "G1 F200", "(comment)", "G4 P1", "G28 X0"] {
            let out = p.process(line, &at_x(0.0, DistanceMode::Absolute)).unwrap();
            assert_eq!(out, vec![line.to_string()]);
        }
        assert!(!p.state().is_initialized());
    }

    #[test]
    fn reversal_in_absolute_mode() {
        let mut p = processor();
        p.process("G1 X5", &at_x(0.0, DistanceMode::Absolute)).unwrap();
        let out = p.process("G1 X-5", &at_x(5.0, DistanceMode::Absolute)).unwrap();
        assert_eq!(out, vec!["G1 X4.9", "G1 X-5.1"]);
        assert_eq!(p.state().active_compensation().x, -0.1);
    }

    #[test]
    fn returning_to_calibration_direction_removes_compensation() {
        let mut p = processor();
        p.process("G1 X-5", &at_x(0.0, DistanceMode::Absolute)).unwrap();
        let out = p.process("G1 X2", &at_x(-5.0, DistanceMode::Absolute)).unwrap();
        assert_eq!(out, vec!["G1 X-5", "G1 X2"]);
        assert_eq!(p.state().active_compensation().x, 0.0);
    }

    #[test]
    fn failing_line_leaves_state_untouched() {
        let mut p = processor();
        let before = *p.state();
        let err = p
            .process("G0 X-1 G1 X-2", &at_x(0.0, DistanceMode::Absolute))
            .unwrap_err();
        assert_eq!(err.kind, ProcessingErrorKind::MultipleDestinations);
        assert_eq!(*p.state(), before);
    }

    #[test]
    fn non_finite_coordinate_is_internal_failure() {
        let mut p = processor();
        let mut state = at_x(0.0, DistanceMode::Absolute);
        state.current_point.x = f64::NAN;
        let err = p.process("G1 X1", &state).unwrap_err();
        assert!(matches!(err.kind, ProcessingErrorKind::Internal(_)));
    }

    #[test]
    fn unknown_code_on_move_line_fails() {
        let mut p = processor();
        let err = p
            .process("G53 G0 X1", &at_x(0.0, DistanceMode::Absolute))
            .unwrap_err();
        assert_eq!(
            err.kind,
            ProcessingErrorKind::UnknownCommand("G53".to_string())
        );
    }

    #[test]
    fn describe_is_static() {
        assert_eq!(
            processor().describe(),
            "Insert moves to compensate for machine backlash"
        );
    }
}
