//! Stampfile Organizer
//!
//! Moves files into bucket directories named after a date.
//!
//! ## Bucket Layout
//!
//! The date comes either from the file's creation time or from the stamp embedded in a
//! date- or date-time-stamped file name. The file keeps its name:
//!
//! ```text
//! <target_root>/
//! ├── 20210615/          # FileOrganizerMode::Date
//! │   └── FileName_20210615.ext
//! ├── 202106/            # FileOrganizerMode::YearMonth
//! └── 2021/              # FileOrganizerMode::Year
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use stampfile_organizer::{FileOrganizer, FileOrganizerMode};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let organizer = FileOrganizer::new(Path::new("archive"), FileOrganizerMode::YearMonth)?;
//! organizer.organize_all(Path::new("inbox"), "*.jpg")?;
//! # Ok(())
//! # }
//! ```

mod constants;
mod mode;
mod organizer;
mod wildcard;

pub use constants::DEFAULT_WILDCARD;
pub use mode::FileOrganizerMode;
pub use organizer::FileOrganizer;
pub use wildcard::Wildcard;

use std::path::PathBuf;

/// Errors that can occur while organizing files
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    /// Target root exists but is not a directory
    #[error("Invalid target directory: {0}")]
    InvalidTargetDirectory(String),

    /// Source directory does not exist or is not a directory
    #[error("Invalid source directory: {0}")]
    InvalidSourceDirectory(String),

    /// A different file already occupies the destination
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// The path has no final file name component
    #[error("Path has no file name: {}", .0.display())]
    MissingFileName(PathBuf),

    /// Wildcard could not be compiled
    #[error("Invalid wildcard: {0}")]
    InvalidWildcard(String),

    /// Mode name not recognised
    #[error("Invalid organizer mode: {0}")]
    InvalidMode(String),

    /// Stamped file name could not be parsed
    #[error("Stamp error: {0}")]
    Stamp(#[from] stampfile_core::StampError),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OrganizeResult<T> = Result<T, OrganizeError>;
