//! Date-bucketed file organizer.
//!
//! [`FileOrganizer`] moves files under `<target_root>/<bucket>/`, where the bucket name is
//! derived from a date by [`FileOrganizerMode`]. The date is either the file's creation time
//! or the value stamped into its name.
//!
//! # Failure Model
//!
//! Every move is independent. Bulk operations stop at the first failure and return it;
//! files moved before that point stay moved. Creating the bucket directory and moving the
//! file are separate steps, so a concurrent creator of the same bucket is harmless, but two
//! callers moving the same source file race with an unspecified winner.

use crate::{FileOrganizerMode, OrganizeError, OrganizeResult, Wildcard};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use stampfile_core::{
    DateStampedName, DateTimeStampedName, Separator, StampError, StampFormat, StampedName,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Organizes files into date-named bucket directories under a target root.
#[derive(Debug, Clone)]
pub struct FileOrganizer {
    /// Root under which bucket directories are created
    target_root: PathBuf,

    /// Bucket naming scheme
    mode: FileOrganizerMode,
}

fn io_error(e: io::Error, context: String) -> OrganizeError {
    OrganizeError::Io(io::Error::new(e.kind(), format!("{}: {}", context, e)))
}

fn utf8_path(path: &Path) -> OrganizeResult<&str> {
    path.to_str().ok_or_else(|| {
        OrganizeError::Stamp(StampError::InvalidInput(format!(
            "path is not valid UTF-8: {}",
            path.display()
        )))
    })
}

/// Reads the date a file was created, in local time.
///
/// Where the platform or filesystem cannot report creation time, the modification time is
/// used instead.
fn creation_date(file: &Path) -> OrganizeResult<NaiveDate> {
    let metadata = fs::metadata(file)
        .map_err(|e| io_error(e, format!("Failed to read metadata for {}", file.display())))?;

    let time = match metadata.created() {
        Ok(time) => time,
        Err(e) => {
            tracing::warn!(
                "creation time unavailable for {} ({}), using modification time",
                file.display(),
                e
            );
            metadata.modified().map_err(|e| {
                io_error(e, format!("Failed to read timestamps for {}", file.display()))
            })?
        }
    };

    Ok(DateTime::<Local>::from(time).date_naive())
}

/// Lists regular files directly inside `source_dir` whose names match `wildcard`,
/// sorted by path.
fn list_files(source_dir: &Path, wildcard: &str) -> OrganizeResult<Vec<(PathBuf, fs::Metadata)>> {
    if !source_dir.is_dir() {
        return Err(OrganizeError::InvalidSourceDirectory(format!(
            "Not a directory: {}",
            source_dir.display()
        )));
    }

    let wildcard = Wildcard::new(wildcard)?;
    let entries = fs::read_dir(source_dir).map_err(|e| {
        io_error(e, format!("Failed to read directory {}", source_dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(OrganizeError::Io)?.path();
        let metadata = fs::metadata(&path).map_err(OrganizeError::Io)?;
        if !metadata.is_file() {
            continue;
        }

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if wildcard.is_match(name) => files.push((path, metadata)),
            Some(_) => {}
            None => tracing::debug!("skipping non UTF-8 file name: {}", path.display()),
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Moves `source` to `destination`. A rename across filesystems is replaced by a copy
/// followed by removal of the source; any other rename failure is returned as is.
fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
    let move_context = || {
        format!(
            "Failed to move {} to {}",
            source.display(),
            destination.display()
        )
    };

    match fs::rename(source, destination) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                "{} is on another filesystem, copying instead",
                destination.display()
            );
        }
        Err(e) => return Err(io_error(e, move_context())),
    }

    if let Err(e) = fs::copy(source, destination) {
        // The destination was free before the copy, so anything there now is a partial copy.
        discard_copy(destination);
        return Err(io_error(e, move_context()));
    }

    if let Err(e) = fs::remove_file(source) {
        // Leave exactly one copy behind.
        discard_copy(destination);
        return Err(io_error(
            e,
            format!("Failed to remove moved file {}", source.display()),
        ));
    }
    Ok(())
}

fn discard_copy(destination: &Path) {
    match fs::remove_file(destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "failed to remove incomplete copy {}: {}",
            destination.display(),
            e
        ),
    }
}

impl FileOrganizer {
    /// Creates a new `FileOrganizer`
    ///
    /// The target root does not need to exist; it is created with the first bucket.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidTargetDirectory`] if `target_root` exists but is not a
    /// directory.
    pub fn new(target_root: &Path, mode: FileOrganizerMode) -> OrganizeResult<Self> {
        if target_root.exists() && !target_root.is_dir() {
            return Err(OrganizeError::InvalidTargetDirectory(format!(
                "Path is not a directory: {}",
                target_root.display()
            )));
        }

        Ok(Self {
            target_root: target_root.to_path_buf(),
            mode,
        })
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    pub fn mode(&self) -> FileOrganizerMode {
        self.mode
    }

    /// Returns `<target_root>/<bucket>` for `date`.
    #[must_use]
    pub fn bucket_dir(&self, date: &impl Datelike) -> PathBuf {
        self.target_root.join(self.mode.bucket_name(date))
    }

    /// Organizes a file by its creation date.
    ///
    /// # Returns
    ///
    /// The path the file now lives at.
    pub fn organize(&self, file: &Path) -> OrganizeResult<PathBuf> {
        let date = creation_date(file)?;
        self.move_into_bucket(file, &date)
    }

    /// Organizes a stamped file by the date in its stamp.
    ///
    /// The file moved is the one at the stamped name's formatted path.
    pub fn organize_stamped<F>(&self, stamped: &StampedName<F>) -> OrganizeResult<PathBuf>
    where
        F: StampFormat,
        F::Value: Datelike,
    {
        self.move_into_bucket(&stamped.path(), stamped.stamp_value())
    }

    /// Organizes every file in `source_dir` matching `wildcard` by creation date.
    pub fn organize_all(&self, source_dir: &Path, wildcard: &str) -> OrganizeResult<Vec<PathBuf>> {
        self.organize_all_when(source_dir, wildcard, |_, _| true)
    }

    /// Organizes every file in `source_dir` matching `wildcard` for which `condition`
    /// holds, by creation date.
    pub fn organize_all_when<P>(
        &self,
        source_dir: &Path,
        wildcard: &str,
        mut condition: P,
    ) -> OrganizeResult<Vec<PathBuf>>
    where
        P: FnMut(&Path, &fs::Metadata) -> bool,
    {
        let mut moved = Vec::new();
        for (path, metadata) in list_files(source_dir, wildcard)? {
            if !condition(&path, &metadata) {
                tracing::debug!("condition not met, skipping {}", path.display());
                continue;
            }
            moved.push(self.organize(&path)?);
        }
        Ok(moved)
    }

    /// Organizes every date-stamped file in `source_dir` matching `wildcard` by its stamp.
    ///
    /// # Errors
    ///
    /// A matching file whose name carries no date stamp fails with
    /// [`OrganizeError::Stamp`].
    pub fn organize_all_date_stamped(
        &self,
        source_dir: &Path,
        wildcard: &str,
        separator: Separator,
    ) -> OrganizeResult<Vec<PathBuf>> {
        let mut moved = Vec::new();
        for (path, _) in list_files(source_dir, wildcard)? {
            let stamped = DateStampedName::parse(utf8_path(&path)?, separator)?;
            moved.push(self.organize_stamped(&stamped)?);
        }
        Ok(moved)
    }

    /// Organizes every date-time-stamped file in `source_dir` matching `wildcard` by its
    /// stamp.
    pub fn organize_all_date_time_stamped(
        &self,
        source_dir: &Path,
        wildcard: &str,
        separator: Separator,
    ) -> OrganizeResult<Vec<PathBuf>> {
        let mut moved = Vec::new();
        for (path, _) in list_files(source_dir, wildcard)? {
            let stamped = DateTimeStampedName::parse(utf8_path(&path)?, separator)?;
            moved.push(self.organize_stamped(&stamped)?);
        }
        Ok(moved)
    }

    fn move_into_bucket(&self, source: &Path, date: &impl Datelike) -> OrganizeResult<PathBuf> {
        let file_name = source
            .file_name()
            .ok_or_else(|| OrganizeError::MissingFileName(source.to_path_buf()))?;
        let bucket = self.bucket_dir(date);
        let destination = bucket.join(file_name);

        if destination.exists() {
            let same = fs::canonicalize(source)
                .and_then(|s| fs::canonicalize(&destination).map(|d| s == d))
                .map_err(|e| io_error(e, format!("Failed to resolve {}", source.display())))?;
            if same {
                tracing::debug!("already organized: {}", destination.display());
                return Ok(destination);
            }
            return Err(OrganizeError::DestinationExists(destination));
        }

        fs::create_dir_all(&bucket).map_err(|e| {
            io_error(e, format!("Failed to create bucket directory {}", bucket.display()))
        })?;
        move_file(source, &destination)?;

        tracing::info!("moved {} -> {}", source.display(), destination.display());
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inbox(temp: &TempDir) -> PathBuf {
        let inbox = temp.path().join("inbox");
        fs::create_dir_all(&inbox).unwrap();
        inbox
    }

    #[test]
    fn test_new_rejects_file_as_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.txt");
        fs::write(&target, "not a directory").unwrap();

        let result = FileOrganizer::new(&target, FileOrganizerMode::Date);
        assert!(matches!(
            result,
            Err(OrganizeError::InvalidTargetDirectory(_))
        ));
    }

    #[test]
    fn test_new_accepts_missing_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("archive");

        let organizer = FileOrganizer::new(&target, FileOrganizerMode::Year).unwrap();
        assert_eq!(organizer.target_root(), target.as_path());
        assert_eq!(organizer.mode(), FileOrganizerMode::Year);
        assert!(!target.exists());
    }

    #[test]
    fn test_organize_by_creation_date() {
        let temp = TempDir::new().unwrap();
        let source = inbox(&temp).join("photo.jpg");
        fs::write(&source, b"jpeg").unwrap();
        let expected_date = creation_date(&source).unwrap();

        let target = temp.path().join("archive");
        let organizer = FileOrganizer::new(&target, FileOrganizerMode::Date).unwrap();
        let moved = organizer.organize(&source).unwrap();

        assert_eq!(
            moved,
            target
                .join(expected_date.format("%Y%m%d").to_string())
                .join("photo.jpg")
        );
        assert!(moved.exists());
        assert!(!source.exists());
        assert_eq!(fs::read(&moved).unwrap(), b"jpeg");
    }

    #[test]
    fn test_organize_stamped_year_month() {
        let temp = TempDir::new().unwrap();
        let source = inbox(&temp).join("FileName_20210615.ext");
        fs::write(&source, b"content").unwrap();

        let stamped = DateStampedName::parse(source.to_str().unwrap(), Separator::DEFAULT).unwrap();
        let target = temp.path().join("archive");
        let organizer = FileOrganizer::new(&target, FileOrganizerMode::YearMonth).unwrap();
        let moved = organizer.organize_stamped(&stamped).unwrap();

        assert_eq!(moved, target.join("202106").join("FileName_20210615.ext"));
        assert!(moved.exists());
        assert!(!source.exists());
    }

    #[test]
    fn test_organize_stamped_date_time_by_year() {
        let temp = TempDir::new().unwrap();
        let source = inbox(&temp).join("scan.pdf.20191231_235959");
        fs::write(&source, b"pdf").unwrap();

        let stamped =
            DateTimeStampedName::parse(source.to_str().unwrap(), Separator::DEFAULT).unwrap();
        let organizer =
            FileOrganizer::new(&temp.path().join("archive"), FileOrganizerMode::Year).unwrap();
        let moved = organizer.organize_stamped(&stamped).unwrap();

        assert!(moved.ends_with("2019/scan.pdf.20191231_235959"));
        assert!(moved.exists());
    }

    #[test]
    fn test_organize_stamped_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("archive");
        let bucket = target.join("20210615");
        fs::create_dir_all(&bucket).unwrap();
        let already = bucket.join("FileName_20210615.ext");
        fs::write(&already, b"content").unwrap();

        let stamped =
            DateStampedName::parse(already.to_str().unwrap(), Separator::DEFAULT).unwrap();
        let organizer = FileOrganizer::new(&target, FileOrganizerMode::Date).unwrap();
        let moved = organizer.organize_stamped(&stamped).unwrap();

        assert_eq!(moved, already);
        assert_eq!(fs::read(&already).unwrap(), b"content");
    }

    #[test]
    fn test_organize_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let source = inbox(&temp).join("FileName_20210615.ext");
        fs::write(&source, b"new").unwrap();

        let target = temp.path().join("archive");
        fs::create_dir_all(target.join("20210615")).unwrap();
        fs::write(target.join("20210615").join("FileName_20210615.ext"), b"old").unwrap();

        let stamped = DateStampedName::parse(source.to_str().unwrap(), Separator::DEFAULT).unwrap();
        let organizer = FileOrganizer::new(&target, FileOrganizerMode::Date).unwrap();
        let result = organizer.organize_stamped(&stamped);

        assert!(matches!(result, Err(OrganizeError::DestinationExists(_))));
        assert_eq!(fs::read(&source).unwrap(), b"new");
    }

    #[test]
    fn test_move_file_renames() {
        let temp = TempDir::new().unwrap();
        let source = inbox(&temp).join("a.txt");
        fs::write(&source, b"data").unwrap();
        let destination = temp.path().join("a.txt");

        move_file(&source, &destination).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&destination).unwrap(), b"data");
    }

    #[test]
    fn test_move_file_failed_rename_leaves_source_alone() {
        let temp = TempDir::new().unwrap();
        let source = inbox(&temp).join("a.txt");
        fs::write(&source, b"data").unwrap();
        let occupied = temp.path().join("occupied");
        fs::create_dir_all(occupied.join("child")).unwrap();

        let result = move_file(&source, &occupied);

        assert!(matches!(result, Err(OrganizeError::Io(_))));
        assert_eq!(fs::read(&source).unwrap(), b"data");
        assert!(occupied.join("child").is_dir());
    }

    #[test]
    fn test_discard_copy_tolerates_missing_file() {
        let temp = TempDir::new().unwrap();
        discard_copy(&temp.path().join("never-written.txt"));

        let partial = temp.path().join("partial.txt");
        fs::write(&partial, b"half").unwrap();
        discard_copy(&partial);
        assert!(!partial.exists());
    }

    #[test]
    fn test_organize_missing_file() {
        let temp = TempDir::new().unwrap();
        let organizer =
            FileOrganizer::new(&temp.path().join("archive"), FileOrganizerMode::Date).unwrap();

        let result = organizer.organize(&temp.path().join("missing.txt"));
        assert!(matches!(result, Err(OrganizeError::Io(_))));
    }

    #[test]
    fn test_organize_all_filters_by_wildcard() {
        let temp = TempDir::new().unwrap();
        let inbox = inbox(&temp);
        fs::write(inbox.join("a.jpg"), b"a").unwrap();
        fs::write(inbox.join("b.txt"), b"b").unwrap();
        fs::create_dir_all(inbox.join("nested.jpg")).unwrap();

        let organizer =
            FileOrganizer::new(&temp.path().join("archive"), FileOrganizerMode::Year).unwrap();
        let moved = organizer.organize_all(&inbox, "*.jpg").unwrap();

        assert_eq!(moved.len(), 1);
        assert!(moved[0].ends_with("a.jpg"));
        assert!(inbox.join("b.txt").exists());
        assert!(inbox.join("nested.jpg").is_dir());
    }

    #[test]
    fn test_organize_all_when_condition() {
        let temp = TempDir::new().unwrap();
        let inbox = inbox(&temp);
        fs::write(inbox.join("empty.log"), b"").unwrap();
        fs::write(inbox.join("full.log"), b"data").unwrap();

        let organizer =
            FileOrganizer::new(&temp.path().join("archive"), FileOrganizerMode::Date).unwrap();
        let moved = organizer
            .organize_all_when(&inbox, "*.log", |_, metadata| metadata.len() > 0)
            .unwrap();

        assert_eq!(moved.len(), 1);
        assert!(moved[0].ends_with("full.log"));
        assert!(inbox.join("empty.log").exists());
    }

    #[test]
    fn test_organize_all_date_stamped() {
        let temp = TempDir::new().unwrap();
        let inbox = inbox(&temp);
        fs::write(inbox.join("a_20200101.txt"), b"a").unwrap();
        fs::write(inbox.join("b.txt.20200215_1"), b"b").unwrap();

        let target = temp.path().join("archive");
        let organizer = FileOrganizer::new(&target, FileOrganizerMode::YearMonth).unwrap();
        let moved = organizer
            .organize_all_date_stamped(&inbox, "*", Separator::DEFAULT)
            .unwrap();

        assert_eq!(
            moved,
            vec![
                target.join("202001").join("a_20200101.txt"),
                target.join("202002").join("b.txt.20200215_1"),
            ]
        );
    }

    #[test]
    fn test_organize_all_date_stamped_stops_at_unstamped_file() {
        let temp = TempDir::new().unwrap();
        let inbox = inbox(&temp);
        fs::write(inbox.join("a_20200101.txt"), b"a").unwrap();
        fs::write(inbox.join("b_unstamped.txt"), b"b").unwrap();

        let target = temp.path().join("archive");
        let organizer = FileOrganizer::new(&target, FileOrganizerMode::Date).unwrap();
        let result = organizer.organize_all_date_stamped(&inbox, "*.txt", Separator::DEFAULT);

        assert!(matches!(result, Err(OrganizeError::Stamp(_))));
        // The earlier move is not rolled back.
        assert!(target.join("20200101").join("a_20200101.txt").exists());
        assert!(inbox.join("b_unstamped.txt").exists());
    }

    #[test]
    fn test_organize_all_date_time_stamped() {
        let temp = TempDir::new().unwrap();
        let inbox = inbox(&temp);
        fs::write(inbox.join("cam-20210615-081500.jpg"), b"img").unwrap();

        let target = temp.path().join("archive");
        let organizer = FileOrganizer::new(&target, FileOrganizerMode::Date).unwrap();
        let moved = organizer
            .organize_all_date_time_stamped(&inbox, "*.jpg", Separator::new('-').unwrap())
            .unwrap();

        assert_eq!(
            moved,
            vec![target.join("20210615").join("cam-20210615-081500.jpg")]
        );
    }

    #[test]
    fn test_organize_all_invalid_source() {
        let temp = TempDir::new().unwrap();
        let organizer =
            FileOrganizer::new(&temp.path().join("archive"), FileOrganizerMode::Date).unwrap();

        let result = organizer.organize_all(&temp.path().join("missing"), "*");
        assert!(matches!(
            result,
            Err(OrganizeError::InvalidSourceDirectory(_))
        ));
    }
}
