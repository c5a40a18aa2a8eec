//! Workspace-wide constants.
//!
//! Single source of truth for numeric tolerances and default paths.

/// Per-axis tolerance used by coordinate equality.
pub const EPSILON: f64 = 0.00001;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Number of machine axes (3 linear + 3 rotational).
pub const AXIS_COUNT: usize = 6;

/// Maximum fractional digits written when regenerating G-code numbers.
pub const DECIMAL_PLACES: usize = 4;

/// Default configuration file for the `gcode_filter` binary.
pub const DEFAULT_CONFIG_PATH: &str = "config/filter.toml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(EPSILON > 0.0 && EPSILON < 0.001);
        assert!(MM_PER_INCH > 1.0);
        assert_eq!(AXIS_COUNT, 6);
        assert!(DECIMAL_PLACES >= 4);
    }
}
