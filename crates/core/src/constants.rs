//! Constants used throughout the stampfile core crate.
//!
//! Format strings are `chrono` strftime specifiers.

use std::ops::RangeInclusive;

/// Date stamp text, `yyyyMMdd`.
pub const DATE_STAMP_FORMAT: &str = "%Y%m%d";

/// Time half of a date-time stamp, `HHmmss`.
pub const TIME_STAMP_FORMAT: &str = "%H%M%S";

/// Regex source for the date stamp text.
pub const DATE_STAMP_PATTERN: &str = "[0-9]{8}";

/// Regex source for the time half of a date-time stamp.
pub const TIME_STAMP_PATTERN: &str = "[0-9]{6}";

/// Years that `%Y` writes as exactly four digits.
pub const STAMP_YEARS: RangeInclusive<i32> = 0..=9999;

/// Regex source for the counter digits following a stamp.
pub const COUNTER_PATTERN: &str = "[0-9]+";

/// Upper bound on counter values tried by the collision-avoiding retry.
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 10_000;
