//! Date-time stamps: `yyyyMMdd<sep>HHmmss`.
//!
//! The separator appears inside the stamp value itself, so the value pattern and the
//! parse format are both built per separator.

use crate::constants::{
    DATE_STAMP_FORMAT, DATE_STAMP_PATTERN, TIME_STAMP_FORMAT, TIME_STAMP_PATTERN,
};
use crate::date::check_stamp_year;
use crate::stamp::{StampFormat, StampedName};
use crate::{StampError, StampResult};
use chrono::{Local, NaiveDateTime, SubsecRound};
use stampfile_types::Separator;

/// [`StampFormat`] for calendar date-times at one-second resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateTimeFormat;

/// The strftime format for a date-time stamp joined by `separator`.
fn strftime_for(separator: Separator) -> String {
    let joiner = match separator.as_char() {
        '%' => "%%".to_owned(),
        c => c.to_string(),
    };
    format!("{DATE_STAMP_FORMAT}{joiner}{TIME_STAMP_FORMAT}")
}

impl StampFormat for DateTimeFormat {
    type Value = NaiveDateTime;

    fn value_pattern(&self, separator: Separator) -> String {
        format!(
            "{}{}{}",
            DATE_STAMP_PATTERN,
            regex::escape(&separator.to_string()),
            TIME_STAMP_PATTERN
        )
    }

    fn format_value(&self, value: &NaiveDateTime, separator: Separator) -> String {
        value.format(&strftime_for(separator)).to_string()
    }

    fn parse_value(&self, text: &str, separator: Separator) -> StampResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, &strftime_for(separator)).map_err(|source| {
            StampError::MalformedStamp {
                text: text.to_owned(),
                source,
            }
        })
    }

    fn check_value(&self, value: &NaiveDateTime) -> StampResult<()> {
        check_stamp_year(value)
    }
}

pub type DateTimeStampedName = StampedName<DateTimeFormat>;

impl StampedName<DateTimeFormat> {
    pub fn new(file_name: impl Into<String>, date_time: NaiveDateTime) -> StampResult<Self> {
        Self::with_format(DateTimeFormat, file_name, date_time)
    }

    /// Stamps `file_name` with the current local date-time, truncated to whole seconds.
    pub fn now(file_name: impl Into<String>) -> StampResult<Self> {
        Self::new(file_name, Local::now().naive_local().trunc_subsecs(0))
    }

    /// Parses a date-time-stamped path.
    pub fn parse(path: &str, separator: Separator) -> StampResult<Self> {
        Self::parse_with(DateTimeFormat, path, separator)
    }

    pub fn date_stamp(&self) -> String {
        self.stamp_value().format(DATE_STAMP_FORMAT).to_string()
    }

    pub fn time_stamp(&self) -> String {
        self.stamp_value().format(TIME_STAMP_FORMAT).to_string()
    }
}
