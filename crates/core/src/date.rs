//! Date stamps: `yyyyMMdd`.
//!
//! ```text
//! FileName.ext  + 2020-01-01  ->  FileName_20200101.ext      (suffix mode)
//!                             ->  FileName.ext.20200101      (extension mode)
//! ```

use crate::constants::{DATE_STAMP_FORMAT, DATE_STAMP_PATTERN, STAMP_YEARS};
use crate::stamp::{StampFormat, StampedName};
use crate::{StampError, StampResult};
use chrono::{Datelike, Local, NaiveDate};
use stampfile_types::Separator;

/// [`StampFormat`] for calendar dates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateFormat;

impl StampFormat for DateFormat {
    type Value = NaiveDate;

    fn value_pattern(&self, _separator: Separator) -> String {
        DATE_STAMP_PATTERN.to_owned()
    }

    fn format_value(&self, value: &NaiveDate, _separator: Separator) -> String {
        value.format(DATE_STAMP_FORMAT).to_string()
    }

    fn parse_value(&self, text: &str, _separator: Separator) -> StampResult<NaiveDate> {
        NaiveDate::parse_from_str(text, DATE_STAMP_FORMAT).map_err(|source| {
            StampError::MalformedStamp {
                text: text.to_owned(),
                source,
            }
        })
    }

    fn check_value(&self, value: &NaiveDate) -> StampResult<()> {
        check_stamp_year(value)
    }
}

/// Ensures `date` formats as exactly eight digits.
pub(crate) fn check_stamp_year(date: &impl Datelike) -> StampResult<()> {
    if STAMP_YEARS.contains(&date.year()) {
        Ok(())
    } else {
        Err(StampError::InvalidInput(format!(
            "year {} cannot be written as a yyyyMMdd stamp",
            date.year()
        )))
    }
}

pub type DateStampedName = StampedName<DateFormat>;

impl StampedName<DateFormat> {
    pub fn new(file_name: impl Into<String>, date: NaiveDate) -> StampResult<Self> {
        Self::with_format(DateFormat, file_name, date)
    }

    /// Stamps `file_name` with the current local date.
    pub fn today(file_name: impl Into<String>) -> StampResult<Self> {
        Self::new(file_name, Local::now().date_naive())
    }

    /// Parses a date-stamped path.
    ///
    /// # Errors
    ///
    /// Fails as [`crate::parse_stamped_path`] does, and with [`StampError::MalformedStamp`]
    /// when the eight digits are not a valid `yyyyMMdd` date.
    pub fn parse(path: &str, separator: Separator) -> StampResult<Self> {
        Self::parse_with(DateFormat, path, separator)
    }

    /// The formatted date stamp, without counter.
    pub fn date_stamp(&self) -> String {
        self.format().format_value(self.stamp_value(), self.separator())
    }
}
