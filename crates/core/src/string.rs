//! Free-form string stamps.
//!
//! Arbitrary strings have no canonical shape, so parsing takes the regex describing the
//! stamp from the caller. A name built with [`StringStampedName::new`] remembers its own
//! value as an escaped literal pattern and can therefore be re-parsed without one.

use crate::stamp::{StampFormat, StampedName};
use crate::StampResult;
use regex::Regex;
use stampfile_types::Separator;

/// [`StampFormat`] for string stamps recognised by a caller-supplied pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringFormat {
    pattern: String,
}

impl StringFormat {
    /// Creates a format recognising stamps by `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StampError::InvalidPattern`] if `pattern` is not a valid regex.
    pub fn new(pattern: impl Into<String>) -> StampResult<Self> {
        let pattern = pattern.into();
        Regex::new(&pattern)?;
        Ok(Self { pattern })
    }

    /// A format recognising exactly `value`.
    pub fn literal(value: &str) -> Self {
        Self {
            pattern: regex::escape(value),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl StampFormat for StringFormat {
    type Value = String;

    fn value_pattern(&self, _separator: Separator) -> String {
        self.pattern.clone()
    }

    fn format_value(&self, value: &String, _separator: Separator) -> String {
        value.clone()
    }

    fn parse_value(&self, text: &str, _separator: Separator) -> StampResult<String> {
        Ok(text.to_owned())
    }
}

pub type StringStampedName = StampedName<StringFormat>;

impl StampedName<StringFormat> {
    pub fn new(file_name: impl Into<String>, value: impl Into<String>) -> StampResult<Self> {
        let value = value.into();
        Self::with_format(StringFormat::literal(&value), file_name, value)
    }

    /// Parses a string-stamped path, recognising the stamp by `pattern`.
    pub fn parse(path: &str, pattern: &str, separator: Separator) -> StampResult<Self> {
        Self::parse_with(StringFormat::new(pattern)?, path, separator)
    }
}
