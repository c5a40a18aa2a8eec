//! G-code line parser.
//!
//! Turns one raw line plus the modal state before it into the ordered
//! [`CommandRecord`]s the processors consume, and the modal state after it.
//!
//! ## Records per line, in execution order
//!
//! | Order | Words            | Destination |
//! |-------|------------------|-------------|
//! | 1     | G93 / G94 / G95  | no          |
//! | 2     | G20 / G21        | no          |
//! | 3     | G17 / G18 / G19  | no          |
//! | 4     | G90 / G91        | no          |
//! | 5     | G4               | no          |
//! | 6     | unrecognized G   | no          |
//! | 7     | G0 .. G3         | if the line has axis words |
//! | 8     | M words          | no          |
//!
//! `F` updates the feed rate before any motion. Axis words without an
//! explicit motion code use the modal motion mode, unless an unrecognized G
//! word on the line may be the one consuming them.

use gcode_common::axis::Axis;
use gcode_common::command::{Code, CommandRecord};
use gcode_common::modal::{DistanceMode, FeedMode, ModalState, Plane};
use gcode_common::units::Units;

use crate::error::ParseError;

/// Records of one line and the modal state once the line has executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub commands: Vec<CommandRecord>,
    pub state: ModalState,
}

/// Upstream collaborator of the processors.
pub trait LineParser {
    fn parse_line(&self, line: &str, state: &ModalState) -> Result<ParsedLine, ParseError>;

    /// Only the command records of `line`.
    fn parse(&self, line: &str, state: &ModalState) -> Result<Vec<CommandRecord>, ParseError> {
        self.parse_line(line, state).map(|parsed| parsed.commands)
    }
}

/// Default RS274-style parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct GcodeLineParser;

// ─── Tokenizer ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Word {
    letter: char,
    text: String,
    value: f64,
}

#[inline]
fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-')
}

fn tokenize(line: &str) -> Result<Vec<Word>, ParseError> {
    let trimmed = line.trim_start();
    // Controller system commands ($H, $X, ...) are not G-code.
    if trimmed.starts_with('$') {
        return Ok(Vec::new());
    }

    let mut words = Vec::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {}
            '%' => {}
            ';' => break,
            '(' => loop {
                match chars.next() {
                    Some(')') => break,
                    Some(_) => {}
                    None => return Err(ParseError::UnterminatedComment),
                }
            },
            c if c.is_ascii_alphabetic() => {
                let letter = c.to_ascii_uppercase();
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_number_char(c) {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                if text.is_empty() {
                    return Err(ParseError::MissingValue(letter));
                }
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber {
                        letter,
                        value: text.clone(),
                    })?;
                words.push(Word {
                    letter,
                    text,
                    value,
                });
            }
            c if is_number_char(c) => {
                let mut text = c.to_string();
                while let Some(&c) = chars.peek() {
                    if !is_number_char(c) {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                return Err(ParseError::MissingLetter(text));
            }
            c => return Err(ParseError::UnexpectedCharacter(c)),
        }
    }
    Ok(words)
}

fn m_code(word: &Word) -> Code {
    if word.value >= 0.0 && word.value.fract() == 0.0 && word.value <= f64::from(u16::MAX) {
        Code::M(word.value as u16)
    } else {
        Code::Unknown(format!("M{}", word.text))
    }
}

// ─── Parser ─────────────────────────────────────────────────────────

impl LineParser for GcodeLineParser {
    fn parse_line(&self, line: &str, state: &ModalState) -> Result<ParsedLine, ParseError> {
        let words = tokenize(line)?;

        let mut g_codes = Vec::new();
        let mut m_codes = Vec::new();
        let mut axis_words = Vec::new();
        let mut feed = None;
        for word in &words {
            match word.letter {
                'G' => g_codes.push(Code::from_g(&word.text)),
                'M' => m_codes.push(m_code(word)),
                'F' => feed = Some(word.value),
                letter => match Axis::from_letter(letter) {
                    Some(axis) => axis_words.push((axis, word.value)),
                    None if matches!(
                        letter,
                        'N' | 'O' | 'P' | 'S' | 'T' | 'I' | 'J' | 'K' | 'R' | 'L' | 'H' | 'D'
                            | 'Q'
                    ) => {}
                    None => return Err(ParseError::UnsupportedWord(letter)),
                },
            }
        }

        let mut next = *state;
        let mut commands = Vec::new();

        for code in &g_codes {
            let feed_mode = match code {
                Code::G93 => FeedMode::InverseTime,
                Code::G94 => FeedMode::UnitsPerMinute,
                Code::G95 => FeedMode::UnitsPerRevolution,
                _ => continue,
            };
            next.feed_mode = feed_mode;
            commands.push(CommandRecord::new(code.clone(), None, next));
        }

        if let Some(rate) = feed {
            next.feed_rate = rate;
        }

        for code in &g_codes {
            let units = match code {
                Code::G20 => Units::Inch,
                Code::G21 => Units::Mm,
                _ => continue,
            };
            next.current_point = next.current_point.get_position_in(units);
            next.units = units;
            commands.push(CommandRecord::new(code.clone(), None, next));
        }

        for code in &g_codes {
            let plane = match code {
                Code::G17 => Plane::XY,
                Code::G18 => Plane::ZX,
                Code::G19 => Plane::YZ,
                _ => continue,
            };
            next.plane = plane;
            commands.push(CommandRecord::new(code.clone(), None, next));
        }

        for code in &g_codes {
            let mode = match code {
                Code::G90 => DistanceMode::Absolute,
                Code::G91 => DistanceMode::Relative,
                _ => continue,
            };
            next.distance_mode = mode;
            commands.push(CommandRecord::new(code.clone(), None, next));
        }

        for code in &g_codes {
            if matches!(code, Code::G4 | Code::Unknown(_)) {
                commands.push(CommandRecord::new(code.clone(), None, next));
            }
        }

        let mut motions: Vec<Code> = g_codes
            .iter()
            .filter(|code| code.motion_mode().is_some())
            .cloned()
            .collect();
        let has_unknown = g_codes.iter().any(|code| matches!(code, Code::Unknown(_)));
        if motions.is_empty() && !axis_words.is_empty() && !has_unknown {
            motions.push(Code::from_motion(next.motion_mode));
        }

        for code in motions {
            if let Some(mode) = code.motion_mode() {
                next.motion_mode = mode;
            }
            if axis_words.is_empty() {
                commands.push(CommandRecord::new(code, None, next));
                continue;
            }
            let mut destination = next.current_point;
            for (axis, value) in &axis_words {
                let target = if next.in_absolute_mode() {
                    *value
                } else {
                    let base = destination.get(*axis);
                    if base.is_nan() { *value } else { base + value }
                };
                destination.set(*axis, target);
            }
            next.current_point = destination;
            commands.push(CommandRecord::new(code, Some(destination), next));
        }

        for code in m_codes {
            commands.push(CommandRecord::new(code, None, next));
        }

        Ok(ParsedLine {
            commands,
            state: next,
        })
    }
}
