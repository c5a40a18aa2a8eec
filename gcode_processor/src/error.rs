//! Processing errors.
//!
//! A single error kind, [`ProcessingError`], carries the offending raw line
//! and the reason the line was rejected. Every failure is deterministic and
//! fatal for the job; nothing is retried.

use thiserror::Error;

/// Malformed line text, reported by the line parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A word letter with no value, e.g. `G1 X`.
    #[error("word '{0}' has no value")]
    MissingValue(char),

    /// A value with no word letter, e.g. `G1 10`.
    #[error("value '{0}' has no word letter")]
    MissingLetter(String),

    /// A word value that is not a number, e.g. `X1.2.3`.
    #[error("invalid number '{value}' for word '{letter}'")]
    InvalidNumber { letter: char, value: String },

    /// A letter this parser does not accept as a word.
    #[error("unsupported word '{0}'")]
    UnsupportedWord(char),

    /// A character that cannot start a word.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// `(` without a closing `)`.
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// Why a line could not be processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingErrorKind {
    #[error("unparseable line: {0}")]
    Unparseable(#[from] ParseError),

    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("arc moves cannot be backlash compensated")]
    UnsupportedArc,

    #[error("more than one command with a destination on the same line")]
    MultipleDestinations,

    #[error("internal failure: {0}")]
    Internal(String),
}

/// Error raised by a command processor for one input line.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("error processing gcode '{line}': {kind}")]
pub struct ProcessingError {
    /// Raw line as received.
    pub line: String,
    pub kind: ProcessingErrorKind,
}

impl ProcessingError {
    pub fn new(line: &str, kind: impl Into<ProcessingErrorKind>) -> Self {
        Self {
            line: line.to_string(),
            kind: kind.into(),
        }
    }
}
