use crate::OrganizeError;
use chrono::Datelike;
use std::{fmt, str::FromStr};

/// How bucket directories are named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FileOrganizerMode {
    /// `yyyyMMdd`
    #[default]
    Date,
    /// `yyyyMM`
    YearMonth,
    /// `yyyy`
    Year,
}

impl FileOrganizerMode {
    /// Returns the bucket directory name for `date`: `yyyyMMdd`, `yyyyMM` or `yyyy`.
    pub fn bucket_name(&self, date: &impl Datelike) -> String {
        match self {
            Self::Date => format!("{:04}{:02}{:02}", date.year(), date.month(), date.day()),
            Self::YearMonth => format!("{:04}{:02}", date.year(), date.month()),
            Self::Year => format!("{:04}", date.year()),
        }
    }
}

impl fmt::Display for FileOrganizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Date => "date",
            Self::YearMonth => "year-month",
            Self::Year => "year",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FileOrganizerMode {
    type Err = OrganizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "year-month" | "yearmonth" => Ok(Self::YearMonth),
            "year" => Ok(Self::Year),
            other => Err(OrganizeError::InvalidMode(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_bucket_names() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();

        assert_eq!(FileOrganizerMode::Date.bucket_name(&date), "20210615");
        assert_eq!(FileOrganizerMode::YearMonth.bucket_name(&date), "202106");
        assert_eq!(FileOrganizerMode::Year.bucket_name(&date), "2021");
    }

    #[test]
    fn test_bucket_name_from_date_time() {
        let date_time = NaiveDate::from_ymd_opt(2021, 6, 15)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();

        assert_eq!(FileOrganizerMode::Date.bucket_name(&date_time), "20210615");
    }

    #[test]
    fn test_bucket_names_are_zero_padded() {
        let date = NaiveDate::from_ymd_opt(987, 1, 2).unwrap();

        assert_eq!(FileOrganizerMode::Date.bucket_name(&date), "09870102");
        assert_eq!(FileOrganizerMode::YearMonth.bucket_name(&date), "098701");
        assert_eq!(FileOrganizerMode::Year.bucket_name(&date), "0987");
    }

    #[test]
    fn test_default_mode_is_date() {
        assert_eq!(FileOrganizerMode::default(), FileOrganizerMode::Date);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "year-month".parse::<FileOrganizerMode>().unwrap(),
            FileOrganizerMode::YearMonth
        );
        assert_eq!(
            " Year ".parse::<FileOrganizerMode>().unwrap(),
            FileOrganizerMode::Year
        );
        assert!(matches!(
            "week".parse::<FileOrganizerMode>(),
            Err(OrganizeError::InvalidMode(_))
        ));
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [
            FileOrganizerMode::Date,
            FileOrganizerMode::YearMonth,
            FileOrganizerMode::Year,
        ] {
            assert_eq!(mode.to_string().parse::<FileOrganizerMode>().unwrap(), mode);
        }
    }
}
