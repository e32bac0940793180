//! The stamped-filename codec shared by every stamp type.
//!
//! A stamped name embeds a stamp (and an optional counter) into a file name in one of two
//! placements:
//!
//! ```text
//! extension mode:  <file_name>.<stamp>[<sep><counter>]
//! suffix mode:     <file_name><sep><stamp>[<sep><counter>]
//!                  <base><sep><stamp>[<sep><counter>].<ext>
//! ```
//!
//! Stamp types plug into the codec through [`StampFormat`], which supplies the textual shape
//! of the stamp (a regex) and the conversion between stamp text and stamp value. Formatting
//! is [`StampedName`]'s `Display` implementation; parsing is [`parse_stamped_path`] followed
//! by [`StampFormat::parse_value`].
//!
//! # Parsing precedence
//!
//! A path is first tested for an extension-mode stamp anchored at the end of the file name.
//! Only if that fails is the rightmost suffix-mode stamp searched for. Extension mode
//! therefore wins whenever both readings are possible, mirroring formatting, where
//! extension placement overrides any real extension.

use crate::config::{CoreConfig, RetryPolicy};
use crate::constants::COUNTER_PATTERN;
use crate::{StampError, StampResult};
use regex::Regex;
use stampfile_types::{NonEmptyText, Separator};
use std::fmt;
use std::path::{is_separator, PathBuf};

const VALUE_GROUP: &str = "stamp_value";
const COUNTER_GROUP: &str = "stamp_counter";
const STAMP_GROUP: &str = "stamp";

/// Describes how one kind of stamp value is written into, and read back from, a file name.
pub trait StampFormat: Clone + fmt::Debug + PartialEq {
    /// The payload embedded in the file name.
    type Value: Clone + fmt::Debug + PartialEq;

    /// Regex source matching the stamp value text, without the counter.
    fn value_pattern(&self, separator: Separator) -> String;

    /// Renders the stamp value text.
    fn format_value(&self, value: &Self::Value, separator: Separator) -> String;

    /// Converts stamp value text recovered by parsing back into a value.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::MalformedStamp`] when the text has the loose shape of the
    /// pattern but not the exact format of the value.
    fn parse_value(&self, text: &str, separator: Separator) -> StampResult<Self::Value>;

    /// Rejects values whose formatted text would not match [`Self::value_pattern`].
    fn check_value(&self, _value: &Self::Value) -> StampResult<()> {
        Ok(())
    }
}

/// The parts recovered from a stamped path, before the value text is interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedStamp {
    /// Unstamped file name, with the directory portion of the input re-attached.
    pub file_name: String,
    /// Stamp value text, without separator or counter.
    pub value_text: String,
    /// Counter following the stamp, 0 when absent.
    pub counter: u32,
    /// Whether the stamp was found in extension position.
    pub stamp_as_extension: bool,
}

/// Splits `path` after its last path separator into `(directory, file_name)`.
///
/// The directory keeps its trailing separator so that the two halves concatenate back
/// to the input exactly.
fn split_directory(path: &str) -> (&str, &str) {
    match path.rfind(is_separator) {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

/// Recovers the unstamped file name, stamp value text and counter from `path`.
///
/// `value_pattern` is the regex source for the stamp value text. It is combined with an
/// optional `<separator><digits>` counter to form the full stamp pattern.
///
/// # Errors
///
/// - [`StampError::InvalidPattern`] if `value_pattern` is not a valid regex
/// - [`StampError::StampNotFound`] if the stamp pattern occurs nowhere in `path`
/// - [`StampError::StampNotInFileName`] if the stamp occurs, but not in extension or suffix
///   position within the file name
/// - [`StampError::MalformedCounter`] if the counter does not fit in a `u32`
pub fn parse_stamped_path(
    path: &str,
    value_pattern: &str,
    separator: Separator,
) -> StampResult<ParsedStamp> {
    let sep = regex::escape(&separator.to_string());
    let stamp = format!(
        "(?P<{VALUE_GROUP}>{value_pattern})(?:{sep}(?P<{COUNTER_GROUP}>{COUNTER_PATTERN}))?"
    );

    if !Regex::new(&stamp)?.is_match(path) {
        return Err(StampError::StampNotFound {
            path: path.to_owned(),
        });
    }

    let (directory, stamped) = split_directory(path);

    let extension = Regex::new(&format!(r"\.(?:{stamp})$"))?;
    let (file_name, caps, stamp_as_extension) = match extension.captures(stamped) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            (stamped[..whole.start].to_owned(), caps, true)
        }
        None => {
            // Greedy head: the stamp group starts at its rightmost possible position, so a
            // reading with a counter is tried first or a long counter would pass for the value.
            // A stamp followed only by a real extension is preferred over a bare occurrence.
            let counted = format!(
                "(?P<{VALUE_GROUP}>{value_pattern}){sep}(?P<{COUNTER_GROUP}>{COUNTER_PATTERN})"
            );
            let bare = format!("(?P<{VALUE_GROUP}>{value_pattern})");
            let suffix_patterns = [
                format!(r"(?s)^.*(?P<{STAMP_GROUP}>{sep}(?:{counted}))(?:\.[^.]*)?$"),
                format!(r"(?s)^.*(?P<{STAMP_GROUP}>{sep}(?:{bare}))(?:\.[^.]*)?$"),
                format!(r"(?s)^.*(?P<{STAMP_GROUP}>{sep}(?:{counted}))"),
                format!(r"(?s)^.*(?P<{STAMP_GROUP}>{sep}(?:{bare}))"),
            ];
            let mut found = None;
            for pattern in &suffix_patterns {
                if let Some(caps) = Regex::new(pattern)?.captures(stamped) {
                    found = Some(caps);
                    break;
                }
            }
            let caps = found.ok_or_else(|| StampError::StampNotInFileName {
                file_name: stamped.to_owned(),
            })?;
            let range = caps.name(STAMP_GROUP).map_or(0..0, |m| m.range());
            let mut file_name = String::with_capacity(stamped.len() - range.len());
            file_name.push_str(&stamped[..range.start]);
            file_name.push_str(&stamped[range.end..]);
            (file_name, caps, false)
        }
    };

    let value_text = caps
        .name(VALUE_GROUP)
        .map_or("", |m| m.as_str())
        .to_owned();
    let counter = match caps.name(COUNTER_GROUP) {
        Some(m) => m
            .as_str()
            .parse::<u32>()
            .map_err(|_| StampError::MalformedCounter(m.as_str().to_owned()))?,
        None => 0,
    };

    Ok(ParsedStamp {
        file_name: format!("{directory}{file_name}"),
        value_text,
        counter,
        stamp_as_extension,
    })
}

/// A file name together with the stamp it carries.
///
/// The value validates once at construction: the file name is never blank and the separator
/// is always a usable character. Builder methods return updated copies.
#[derive(Clone, Debug, PartialEq)]
pub struct StampedName<F: StampFormat> {
    file_name: NonEmptyText,
    value: F::Value,
    separator: Separator,
    stamp_as_extension: bool,
    counter: u32,
    format: F,
}

impl<F: StampFormat> StampedName<F> {
    /// Creates a suffix-mode stamped name with the default separator and no counter.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::Text`] if `file_name` is empty or whitespace-only, or the
    /// error of [`StampFormat::check_value`] if `value` cannot be written as a stamp.
    pub fn with_format(
        format: F,
        file_name: impl Into<String>,
        value: F::Value,
    ) -> StampResult<Self> {
        format.check_value(&value)?;
        Ok(Self {
            file_name: NonEmptyText::new(file_name)?,
            value,
            separator: Separator::DEFAULT,
            stamp_as_extension: false,
            counter: 0,
            format,
        })
    }

    /// Parses `path` using `format`'s pattern and value conversion.
    pub fn parse_with(format: F, path: &str, separator: Separator) -> StampResult<Self> {
        let pattern = format.value_pattern(separator);
        let parsed = parse_stamped_path(path, &pattern, separator)?;
        let value = format.parse_value(&parsed.value_text, separator)?;

        Ok(Self {
            file_name: NonEmptyText::new(parsed.file_name)?,
            value,
            separator,
            stamp_as_extension: parsed.stamp_as_extension,
            counter: parsed.counter,
            format,
        })
    }

    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn stamp_as_extension(mut self, stamp_as_extension: bool) -> Self {
        self.stamp_as_extension = stamp_as_extension;
        self
    }

    /// Sets the counter. Negative values become 0; values above `u32::MAX` saturate.
    #[must_use]
    pub fn with_counter(mut self, counter: i64) -> Self {
        self.counter = u32::try_from(counter.max(0)).unwrap_or(u32::MAX);
        self
    }

    /// Applies the separator and placement from `config`.
    #[must_use]
    pub fn with_config(self, config: &CoreConfig) -> Self {
        self.with_separator(config.separator())
            .stamp_as_extension(config.stamp_as_extension())
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    pub fn stamp_value(&self) -> &F::Value {
        &self.value
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn is_stamp_as_extension(&self) -> bool {
        self.stamp_as_extension
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    /// The stamp text as written into the name, including a non-zero counter.
    pub fn stamp_text(&self) -> String {
        let value = self.format.format_value(&self.value, self.separator);
        if self.counter == 0 {
            value
        } else {
            format!("{}{}{}", value, self.separator, self.counter)
        }
    }

    /// The formatted stamped name as a path.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.to_string())
    }

    /// Consumes the stamped name, returning `(file_name, value, counter)`.
    pub fn into_parts(self) -> (String, F::Value, u32) {
        (self.file_name.into_string(), self.value, self.counter)
    }

    /// Returns a copy whose formatted path does not exist on disk.
    ///
    /// Starting from the current counter, each candidate is checked for existence and the
    /// counter is incremented until a free path is found. The existence check and any later
    /// write are not atomic; a concurrent writer can still claim the returned name.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::RetryLimitExceeded`] once `policy.max_attempts()` candidates
    /// have all been taken, or if the counter would overflow.
    pub fn next_available(&self, policy: &RetryPolicy) -> StampResult<Self> {
        let mut candidate = self.clone();
        let mut attempts = 0u32;
        loop {
            let path = candidate.path();
            attempts += 1;
            if !path.exists() {
                return Ok(candidate);
            }
            tracing::debug!("stamped name already exists: {}", path.display());

            let next = candidate.counter.checked_add(1);
            match next {
                Some(counter) if attempts < policy.max_attempts() => candidate.counter = counter,
                _ => {
                    return Err(StampError::RetryLimitExceeded {
                        last_candidate: path,
                        attempts,
                    })
                }
            }
        }
    }

    /// Formats the first stamped name, by counter, that does not exist on disk.
    pub fn to_string_with_retry(&self, policy: &RetryPolicy) -> StampResult<String> {
        Ok(self.next_available(policy)?.to_string())
    }
}

impl<F: StampFormat> fmt::Display for StampedName<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = self.stamp_text();
        let name = self.file_name.as_str();

        if self.stamp_as_extension {
            return write!(f, "{}.{}", name, stamp);
        }

        // Only the final path component may contribute the extension dot.
        let base_start = name.rfind(is_separator).map_or(0, |idx| idx + 1);
        match name[base_start..].rfind('.') {
            Some(dot) => {
                let (base, ext) = name.split_at(base_start + dot);
                write!(f, "{}{}{}{}", base, self.separator, stamp, ext)
            }
            None => write!(f, "{}{}{}", name, self.separator, stamp),
        }
    }
}
