//! # Stat Name Validation
//!
//! Names, tag keys and tag values must be:
//!
//! 1. non-empty
//! 2. valid UTF-8
//! 3. ASCII only
//! 4. free of non-printable (control) characters
//! 5. free of whitespace
//!
//! The rules are checked in that order against the whole string and the first
//! one that fails is the only one reported. Whitespace control characters
//! such as `\t` and `\n` count as whitespace, not as non-printable.
//!
//! Tag values additionally have to survive [`replace_chars`] unchanged.
//!
//! Validation is stateless: the same input always gives the same verdict.

use std::fmt;

use stats_core::tags::replace_chars;
use stats_core::TagSet;

use crate::error::ValidationError;

/// A per-character rule: a predicate and the error it produces.
struct CharRule {
    violates: fn(char) -> bool,
    error: fn(char, &str) -> ValidationError,
}

fn is_non_ascii(c: char) -> bool {
    !c.is_ascii()
}

fn is_non_printable(c: char) -> bool {
    c.is_control() && !c.is_whitespace()
}

fn non_ascii(rune: char, value: &str) -> ValidationError {
    ValidationError::NonAscii {
        rune,
        value: value.to_string(),
    }
}

fn non_printable(rune: char, value: &str) -> ValidationError {
    ValidationError::NonPrintable {
        rune,
        value: value.to_string(),
    }
}

fn whitespace(rune: char, value: &str) -> ValidationError {
    ValidationError::ContainsWhitespace {
        rune,
        value: value.to_string(),
    }
}

/// Evaluated in order, first failure wins.
const CHAR_RULES: [CharRule; 3] = [
    CharRule {
        violates: is_non_ascii,
        error: non_ascii,
    },
    CharRule {
        violates: is_non_printable,
        error: non_printable,
    },
    CharRule {
        violates: char::is_whitespace,
        error: whitespace,
    },
];

/// Validate a stat name, tag key or tag value.
pub fn validate_name(s: &str) -> Result<(), ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::Empty);
    }
    for rule in &CHAR_RULES {
        if let Some(rune) = s.chars().find(|&c| (rule.violates)(c)) {
            return Err((rule.error)(rune, s));
        }
    }
    Ok(())
}

/// Validate raw bytes, which may not be UTF-8 at all.
pub fn validate_name_bytes(bytes: &[u8]) -> Result<(), ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::Empty);
    }
    let s = std::str::from_utf8(bytes).map_err(|_| ValidationError::InvalidEncoding {
        value: String::from_utf8_lossy(bytes).into_owned(),
    })?;
    validate_name(s)
}

/// True if the sanitizer would leave `value` untouched.
pub fn validate_tag_value_sanitized(value: &str) -> bool {
    replace_chars(value) == value
}

/// Where in a creation call a violation was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// The stat (or scope) name
    Name,
    /// A tag key
    TagKey { key: String },
    /// The value of tag `key`
    TagValue { key: String },
}

impl Subject {
    /// Tag key this subject belongs to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Subject::Name => None,
            Subject::TagKey { key } | Subject::TagValue { key } => Some(key),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Name => write!(f, "stat name"),
            Subject::TagKey { key } => write!(f, "tag key {:?}", key),
            Subject::TagValue { key } => write!(f, "tag value (key={:?})", key),
        }
    }
}

/// One rule broken by one string in a creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub subject: Subject,
    pub error: ValidationError,
}

impl Violation {
    /// Human-readable report for this violation.
    ///
    /// Tag violations embed the full tag map so the offending call is easy
    /// to find.
    pub fn describe(&self, operation: &str, name: &str, tags: &TagSet) -> String {
        match &self.subject {
            Subject::Name => format!("stats: {}: invalid stat name: {}", operation, self.error),
            Subject::TagKey { .. } => format!(
                "stats: {}: invalid stat (name={:?} tags={:?}): tag key error: {}",
                operation, name, tags, self.error
            ),
            Subject::TagValue { key } => format!(
                "stats: {}: invalid stat (name={:?} tags={:?}): tag value error (key={:?}): {}",
                operation, name, tags, key, self.error
            ),
        }
    }
}

/// Validate everything a creation call was given.
///
/// Every tag pair is checked; nothing short-circuits across strings.
pub fn validate_call(name: &str, tags: &TagSet) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Err(error) = validate_name(name) {
        violations.push(Violation {
            subject: Subject::Name,
            error,
        });
    }

    for (key, value) in tags {
        if let Err(error) = validate_name(key) {
            violations.push(Violation {
                subject: Subject::TagKey { key: key.clone() },
                error,
            });
        }
        if let Err(error) = validate_name(value) {
            violations.push(Violation {
                subject: Subject::TagValue { key: key.clone() },
                error,
            });
        }
        let sanitized = replace_chars(value);
        if sanitized != value.as_str() {
            violations.push(Violation {
                subject: Subject::TagValue { key: key.clone() },
                error: ValidationError::UnsanitizedTagValue {
                    value: value.clone(),
                    sanitized: sanitized.into_owned(),
                },
            });
        }
    }

    violations
}
