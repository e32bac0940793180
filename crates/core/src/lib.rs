//! # Stampfile Core
//!
//! Format and parse file names that carry a stamp: a date, a date-time, or an arbitrary
//! string, with an optional counter used to keep names unique on disk.
//!
//! ```
//! use chrono::NaiveDate;
//! use stampfile_core::{DateStampedName, Separator};
//!
//! # fn main() -> Result<(), stampfile_core::StampError> {
//! let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let name = DateStampedName::new("FileName.ext", date)?;
//! assert_eq!(name.to_string(), "FileName_20200101.ext");
//!
//! let parsed = DateStampedName::parse("FileName_20200101.ext", Separator::DEFAULT)?;
//! assert_eq!(parsed.file_name(), "FileName.ext");
//! # Ok(())
//! # }
//! ```
//!
//! **No filesystem layout concerns**: moving files into dated folders belongs in
//! `stampfile-organizer`.

pub mod config;
pub mod constants;
pub mod date;
pub mod date_time;
mod error;
pub mod stamp;
pub mod string;

pub use config::{CoreConfig, RetryPolicy};
pub use date::{DateFormat, DateStampedName};
pub use date_time::{DateTimeFormat, DateTimeStampedName};
pub use error::{StampError, StampResult};
pub use stamp::{parse_stamped_path, ParsedStamp, StampFormat, StampedName};
pub use stampfile_types::{NonEmptyText, Separator};
pub use string::{StringFormat, StringStampedName};
