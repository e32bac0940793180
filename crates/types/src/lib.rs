//! Validated primitive types shared across the stampfile crates.
//!
//! Both types validate once at construction, so holders never re-check them.

use std::{fmt, str::FromStr};

/// Errors that can occur when creating validated text types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating a [`Separator`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SeparatorError {
    /// The NUL character stands in for "no separator" and is rejected
    #[error("Separator cannot be empty")]
    Nul,
    /// A path separator would split the stamp across directories
    #[error("Separator cannot be a path separator: '{0}'")]
    PathSeparator(char),
    /// A digit would be indistinguishable from the stamp and counter digits
    #[error("Separator cannot be a digit: '{0}'")]
    Digit(char),
    /// Parsing from text requires exactly one character
    #[error("Separator must be exactly one character, got: '{0}'")]
    NotSingleChar(String),
}

/// A string type that guarantees non-empty content.
///
/// The input must contain at least one non-whitespace character. It is stored verbatim,
/// without trimming, so that a file name held in a `NonEmptyText` is reproduced exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(s).map_err(serde::de::Error::custom)
    }
}

/// The single character joining a file name, its stamp and its counter.
///
/// Defaults to `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Separator(char);

impl Separator {
    /// The separator used when none is given.
    pub const DEFAULT: Separator = Separator('_');

    /// Creates a new `Separator`.
    ///
    /// # Errors
    ///
    /// Returns [`SeparatorError`] for NUL, `/`, `\` or an ASCII digit.
    pub fn new(c: char) -> Result<Self, SeparatorError> {
        match c {
            '\0' => Err(SeparatorError::Nul),
            '/' | '\\' => Err(SeparatorError::PathSeparator(c)),
            '0'..='9' => Err(SeparatorError::Digit(c)),
            _ => Ok(Self(c)),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Separator {
    type Err = SeparatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Separator::new(c),
            _ => Err(SeparatorError::NotSingleChar(s.to_owned())),
        }
    }
}

impl serde::Serialize for Separator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_char(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Separator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let c = char::deserialize(deserializer)?;
        Separator::new(c).map_err(serde::de::Error::custom)
    }
}
