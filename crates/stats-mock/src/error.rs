//! Error types for the stats mock

use thiserror::Error;

/// The rule a string broke, without the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    Empty,
    InvalidEncoding,
    NonAscii,
    NonPrintable,
    ContainsWhitespace,
    UnsanitizedTagValue,
}

/// A single broken naming rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty string")]
    Empty,

    /// `value` is a lossy rendering of the offending bytes
    #[error("invalid UTF8: {value:?}")]
    InvalidEncoding { value: String },

    #[error("contains non-ASCII character ({rune:?}): {value:?}")]
    NonAscii { rune: char, value: String },

    #[error("contains non-printable character ({rune:?}): {value:?}")]
    NonPrintable { rune: char, value: String },

    #[error("contains whitespace character ({rune:?}): {value:?}")]
    ContainsWhitespace { rune: char, value: String },

    #[error("invalid chars: {value:?} vs. {sanitized:?}")]
    UnsanitizedTagValue { value: String, sanitized: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::Empty => ValidationErrorKind::Empty,
            ValidationError::InvalidEncoding { .. } => ValidationErrorKind::InvalidEncoding,
            ValidationError::NonAscii { .. } => ValidationErrorKind::NonAscii,
            ValidationError::NonPrintable { .. } => ValidationErrorKind::NonPrintable,
            ValidationError::ContainsWhitespace { .. } => ValidationErrorKind::ContainsWhitespace,
            ValidationError::UnsanitizedTagValue { .. } => {
                ValidationErrorKind::UnsanitizedTagValue
            }
        }
    }

    /// The offending character, for rules that point at one.
    pub fn rune(&self) -> Option<char> {
        match self {
            ValidationError::NonAscii { rune, .. }
            | ValidationError::NonPrintable { rune, .. }
            | ValidationError::ContainsWhitespace { rune, .. } => Some(*rune),
            _ => None,
        }
    }
}

/// Errors loading mock configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown reporting mode: {0:?} (expected silent, log, abort or fail)")]
    UnknownReportingMode(String),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },
}
