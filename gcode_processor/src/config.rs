//! Processor configuration.
//!
//! All values are in the machine's active unit system; the processor itself
//! carries no unit tag. Loaded from TOML via
//! [`ConfigLoader`](gcode_common::config::ConfigLoader) and validated before
//! a processor is built.

use serde::{Deserialize, Serialize};

use gcode_common::axis::{Axis, AxisSet};
use gcode_common::config::{ConfigError, MachineConfig};

// ─── Backlash ───────────────────────────────────────────────────────

/// Backlash compensation parameters.
///
/// # TOML Example
///
/// ```toml
/// [backlash]
/// backlash_x = 0.1
/// initial_x = 1.0
/// feed_rate = 500.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacklashConfig {
    /// Lost motion on X (>= 0). Zero disables X compensation.
    #[serde(default)]
    pub backlash_x: f64,
    #[serde(default)]
    pub backlash_y: f64,
    #[serde(default)]
    pub backlash_z: f64,

    /// Calibration offset on X. Its sign fixes the calibration direction.
    #[serde(default)]
    pub initial_x: f64,
    #[serde(default)]
    pub initial_y: f64,
    #[serde(default)]
    pub initial_z: f64,

    /// Feed rate of the calibration moves (> 0).
    pub feed_rate: f64,
}

impl BacklashConfig {
    pub const fn new(
        backlash: [f64; 3],
        initial: [f64; 3],
        feed_rate: f64,
    ) -> Self {
        Self {
            backlash_x: backlash[0],
            backlash_y: backlash[1],
            backlash_z: backlash[2],
            initial_x: initial[0],
            initial_y: initial[1],
            initial_z: initial[2],
            feed_rate,
        }
    }

    /// Backlash magnitude of `axis`; rotational axes are never compensated.
    pub const fn backlash(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.backlash_x,
            Axis::Y => self.backlash_y,
            Axis::Z => self.backlash_z,
            Axis::A | Axis::B | Axis::C => 0.0,
        }
    }

    /// Calibration offset of `axis`.
    pub const fn initial(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.initial_x,
            Axis::Y => self.initial_y,
            Axis::Z => self.initial_z,
            Axis::A | Axis::B | Axis::C => 0.0,
        }
    }

    /// +1.0 or -1.0: the travel direction the calibration block leaves the axis in.
    pub fn calibration_direction(&self, axis: Axis) -> f64 {
        if self.initial(axis) < 0.0 { -1.0 } else { 1.0 }
    }

    /// Compensation applied after a reversal against the calibration direction.
    pub fn signed_backlash(&self, axis: Axis) -> f64 {
        -self.calibration_direction(axis) * self.backlash(axis)
    }

    /// Axes with a nonzero backlash magnitude.
    pub fn supported_axes(&self) -> AxisSet {
        Axis::LINEAR
            .into_iter()
            .filter(|a| self.backlash(*a) != 0.0)
            .fold(AxisSet::empty(), |set, a| set | a.flag())
    }

    /// Validate parameter bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - a backlash magnitude is negative or not finite
    /// - an initial offset is not finite
    /// - `feed_rate` is not finite or not positive
    /// - a supported axis has a zero initial offset (no calibration direction)
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in Axis::LINEAR {
            let backlash = self.backlash(axis);
            if !backlash.is_finite() || backlash < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "backlash_{} {} must be a finite value >= 0",
                    axis.letter().to_ascii_lowercase(),
                    backlash
                )));
            }
            let initial = self.initial(axis);
            if !initial.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "initial_{} {} must be finite",
                    axis.letter().to_ascii_lowercase(),
                    initial
                )));
            }
            if backlash != 0.0 && initial == 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "initial_{0} must be nonzero when backlash_{0} is set",
                    axis.letter().to_ascii_lowercase()
                )));
            }
        }
        if !self.feed_rate.is_finite() || self.feed_rate <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "feed_rate {} must be > 0",
                self.feed_rate
            )));
        }
        Ok(())
    }
}

// ─── Filter binary ──────────────────────────────────────────────────

/// Top-level configuration of the `gcode_filter` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub machine: MachineConfig,
    pub backlash: BacklashConfig,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.machine.validate()?;
        self.backlash.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcode_common::config::ConfigLoader;

    fn valid() -> BacklashConfig {
        BacklashConfig::new([0.1, 0.05, 0.0], [1.0, -2.0, 3.0], 500.0)
    }

    #[test]
    fn supported_axes_follow_magnitude() {
        let config = valid();
        assert_eq!(config.supported_axes(), AxisSet::X | AxisSet::Y);
        assert_eq!(config.backlash(Axis::A), 0.0);
    }

    #[test]
    fn signed_backlash_opposes_calibration() {
        let config = valid();
        assert_eq!(config.calibration_direction(Axis::X), 1.0);
        assert_eq!(config.signed_backlash(Axis::X), -0.1);
        assert_eq!(config.calibration_direction(Axis::Y), -1.0);
        assert_eq!(config.signed_backlash(Axis::Y), 0.05);
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let mut negative = valid();
        negative.backlash_z = -0.1;
        assert!(matches!(negative.validate(), Err(ConfigError::ValidationError(_))));

        let mut no_feed = valid();
        no_feed.feed_rate = 0.0;
        assert!(matches!(no_feed.validate(), Err(ConfigError::ValidationError(_))));

        let mut no_direction = valid();
        no_direction.initial_x = 0.0;
        let err = no_direction.validate().unwrap_err();
        assert!(err.to_string().contains("initial_x"));

        let mut nan = valid();
        nan.initial_y = f64::NAN;
        assert!(nan.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config = FilterConfig::from_toml(
            r#"
[machine]
name = "router-01"

[backlash]
backlash_x = 0.1
initial_x = 1.0
feed_rate = 500.0
"#,
        )
        .unwrap();
        assert_eq!(config.backlash.backlash_y, 0.0);
        assert_eq!(config.backlash.initial_z, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_backlash_fields_are_rejected() {
        let result = FilterConfig::from_toml(
            r#"
[machine]
name = "router-01"

[backlash]
backlash_w = 0.1
feed_rate = 500.0
"#,
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
