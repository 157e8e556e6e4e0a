use std::error::Error;
use std::fmt;

/// Errors raised while turning an infix pattern into postfix order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `)` was found with no open `(` on the operator stack.
    UnmatchedClose { position: usize },
    /// A `(` was never closed.
    UnclosedGroup { position: usize },
    /// The pattern is longer than the converter accepts.
    TooLong { len: usize, max: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PatternError::UnmatchedClose { position } => {
                write!(f, "unmatched ')' at position {}", position)
            }
            PatternError::UnclosedGroup { position } => {
                write!(f, "unclosed '(' opened at position {}", position)
            }
            PatternError::TooLong { len, max } => {
                write!(f, "pattern of {} characters exceeds the limit of {}", len, max)
            }
        }
    }
}

impl Error for PatternError {}

/// Errors raised while building an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    Pattern(PatternError),
    /// Thompson construction did not reduce to a single fragment.
    BuildFailed(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::Pattern(err) => write!(f, "malformed pattern: {}", err),
            BuildError::BuildFailed(reason) => write!(f, "build failed: {}", reason),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BuildError::Pattern(err) => Some(err),
            BuildError::BuildFailed(_) => None,
        }
    }
}

impl From<PatternError> for BuildError {
    fn from(err: PatternError) -> Self {
        BuildError::Pattern(err)
    }
}

/// Errors raised when an externally supplied pattern uses constructs this
/// crate does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    UnsupportedChar { ch: char, position: usize },
    OutsideAlphabet { ch: char },
}

impl fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SanitizeError::UnsupportedChar { ch, position } => {
                write!(f, "unsupported character {:?} at position {}", ch, position)
            }
            SanitizeError::OutsideAlphabet { ch } => {
                write!(f, "literal {:?} is outside the alphabet", ch)
            }
        }
    }
}

impl Error for SanitizeError {}

#[test]
fn build_error_wraps_pattern_error() {
    let err: BuildError = PatternError::UnmatchedClose { position: 3 }.into();
    assert_eq!(err.to_string(), "malformed pattern: unmatched ')' at position 3");
    assert!(err.source().is_some());
}
