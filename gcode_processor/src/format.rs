//! Line-text regeneration.
//!
//! Numbers are written fixed-point with a `.` separator, at most
//! [`DECIMAL_PLACES`] fractional digits and trailing zeros trimmed,
//! independent of locale.

use gcode_common::axis::{Axis, AxisSet};
use gcode_common::command::Code;
use gcode_common::consts::DECIMAL_PLACES;
use gcode_common::modal::DistanceMode;
use gcode_common::partial::PartialPosition;
use gcode_common::point::axis_eq;
use gcode_common::position::Position;

/// Format a word value, e.g. `-5.1`, `500`, `0.0001`.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.*}", DECIMAL_PLACES, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

fn axis_word(axis: Axis, value: f64) -> String {
    format!("{}{}", axis.letter(), format_decimal(value))
}

/// Build a move line from `start` to `end`.
///
/// One word is written per axis that is set in `end` and differs from
/// `start`: the end coordinate in absolute mode, `end - start` in relative
/// mode. Both positions must be in the same units.
pub fn generate_line_from_points(
    code: &Code,
    start: &Position,
    end: &Position,
    mode: DistanceMode,
) -> String {
    let mut line = code.to_string();
    for axis in Axis::ALL {
        let to = end.get(axis);
        let from = start.get(axis);
        if to.is_nan() || axis_eq(from, to) {
            continue;
        }
        let value = match mode {
            DistanceMode::Absolute => to,
            DistanceMode::Relative if from.is_nan() => to,
            DistanceMode::Relative => to - from,
        };
        line.push(' ');
        line.push_str(&axis_word(axis, value));
    }
    line
}

/// Replace the axis words of `line` that `position` carries.
///
/// Axis words already on the line keep their place; axes missing from the
/// line are appended (ahead of a trailing `;` comment). All other text is
/// kept verbatim.
pub fn override_position(line: &str, position: &PartialPosition) -> String {
    let mut out = String::with_capacity(line.len() + 16);
    let mut written = AxisSet::empty();
    let mut trailing_comment = None;
    let mut in_comment = false;

    let mut chars = line.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if in_comment {
            out.push(ch);
            in_comment = ch != ')';
            continue;
        }
        match ch {
            '(' => {
                in_comment = true;
                out.push(ch);
            }
            ';' => {
                trailing_comment = Some(&line[i..]);
                break;
            }
            _ => {
                let replacement = Axis::from_letter(ch).and_then(|a| position.get(a).map(|v| (a, v)));
                let Some((axis, value)) = replacement else {
                    out.push(ch);
                    continue;
                };

                // Measure the word value without committing, so a bare letter stays untouched.
                let mut look = chars.clone();
                let mut consumed = 0;
                let mut seen_number = false;
                while let Some(&(_, c)) = look.peek() {
                    let is_number = c.is_ascii_digit() || matches!(c, '.' | '+' | '-');
                    if !is_number && (seen_number || !c.is_whitespace()) {
                        break;
                    }
                    seen_number |= is_number;
                    look.next();
                    consumed += 1;
                }
                if !seen_number {
                    out.push(ch);
                    continue;
                }
                for _ in 0..consumed {
                    chars.next();
                }
                out.push_str(&axis_word(axis, value));
                written |= axis.flag();
            }
        }
    }

    let missing: Vec<String> = position
        .iter()
        .filter(|(axis, _)| !written.has(*axis))
        .map(|(axis, value)| axis_word(axis, value))
        .collect();

    let mut parts = Vec::with_capacity(3);
    let head = out.trim_end();
    if !head.is_empty() {
        parts.push(head.to_string());
    }
    if !missing.is_empty() {
        parts.push(missing.join(" "));
    }
    if let Some(comment) = trailing_comment {
        if parts.is_empty() || missing.is_empty() {
            // Nothing appended: keep the original spacing before the comment.
            return format!("{out}{comment}");
        }
        parts.push(comment.to_string());
    } else if missing.is_empty() {
        return out;
    }
    parts.join(" ")
}
