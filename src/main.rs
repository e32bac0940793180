use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stampfile_core::config::{
    retry_policy_from_env_value, separator_from_env_value, stamp_as_extension_from_env_value,
};
use stampfile_core::{
    CoreConfig, DateFormat, DateStampedName, DateTimeFormat, DateTimeStampedName, NonEmptyText,
    Separator, StampFormat, StampedName, StringStampedName,
};
use stampfile_organizer::{FileOrganizer, FileOrganizerMode, DEFAULT_WILDCARD};

#[derive(Parser)]
#[command(name = "stampfile")]
#[command(about = "Format, parse and organize date-stamped file names")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum StampKind {
    /// yyyyMMdd
    #[default]
    Date,
    /// yyyyMMdd<sep>HHmmss
    DateTime,
    /// Free-form text
    String,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OrganizeBy {
    /// File creation time
    #[default]
    Created,
    /// Date stamp in the file name
    DateStamp,
    /// Date-time stamp in the file name
    DateTimeStamp,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stamped form of a file name
    Format {
        /// File name to stamp
        file_name: String,
        #[arg(long, value_enum, default_value_t)]
        kind: StampKind,
        /// Stamp value (YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or text); defaults to now
        #[arg(long)]
        value: Option<String>,
        /// Separator character (overrides STAMPFILE_SEPARATOR)
        #[arg(long)]
        separator: Option<Separator>,
        /// Stamp as a trailing extension
        #[arg(long)]
        extension: bool,
        /// Seed counter
        #[arg(long, default_value_t = 0)]
        counter: i64,
        /// Increment the counter until the name is free on disk
        #[arg(long)]
        retry: bool,
    },
    /// Split a stamped path into file name, stamp and counter
    Parse {
        /// Stamped path
        path: String,
        #[arg(long, value_enum, default_value_t)]
        kind: StampKind,
        /// Regex recognising a string stamp (required for --kind string)
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        separator: Option<Separator>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Move files into date-named folders
    Organize {
        /// Directory to take files from
        source: PathBuf,
        /// Root of the date-named folders
        target: PathBuf,
        /// Folder naming: date, year-month or year
        #[arg(long, default_value = "date")]
        mode: FileOrganizerMode,
        #[arg(long, default_value = DEFAULT_WILDCARD)]
        wildcard: String,
        #[arg(long, value_enum, default_value_t)]
        by: OrganizeBy,
        #[arg(long)]
        separator: Option<Separator>,
    },
}

/// Parse result as printed by `stampfile parse --json`.
#[derive(serde::Serialize)]
struct ParsedOutput {
    file_name: NonEmptyText,
    stamp: String,
    counter: u32,
    separator: Separator,
    stamp_as_extension: bool,
}

impl ParsedOutput {
    fn from_stamped<F: StampFormat>(stamped: &StampedName<F>) -> anyhow::Result<Self> {
        Ok(Self {
            file_name: NonEmptyText::new(stamped.file_name())?,
            stamp: stamped
                .format()
                .format_value(stamped.stamp_value(), stamped.separator()),
            counter: stamped.counter(),
            separator: stamped.separator(),
            stamp_as_extension: stamped.is_stamp_as_extension(),
        })
    }
}

/// Resolve core configuration from the process environment, once.
///
/// # Environment Variables
/// - `STAMPFILE_SEPARATOR`: separator character (default: `_`)
/// - `STAMPFILE_STAMP_AS_EXTENSION`: stamp as trailing extension (default: `false`)
/// - `STAMPFILE_MAX_RETRY_ATTEMPTS`: retry ceiling for `format --retry` (default: 10000)
fn load_config() -> anyhow::Result<CoreConfig> {
    let separator = separator_from_env_value(std::env::var("STAMPFILE_SEPARATOR").ok())?;
    let stamp_as_extension =
        stamp_as_extension_from_env_value(std::env::var("STAMPFILE_STAMP_AS_EXTENSION").ok())?;
    let retry = retry_policy_from_env_value(std::env::var("STAMPFILE_MAX_RETRY_ATTEMPTS").ok())?;
    Ok(CoreConfig::new(separator, stamp_as_extension, retry))
}

fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn parse_date_time(value: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .with_context(|| format!("invalid date-time '{}', expected YYYY-MM-DDTHH:MM:SS", value))
}

fn render<F: StampFormat>(
    stamped: StampedName<F>,
    config: &CoreConfig,
    separator: Option<Separator>,
    extension: bool,
    counter: i64,
    retry: bool,
) -> anyhow::Result<String> {
    let stamped = stamped
        .with_config(config)
        .with_separator(separator.unwrap_or(config.separator()))
        .stamp_as_extension(extension || config.stamp_as_extension())
        .with_counter(counter);

    if retry {
        Ok(stamped.to_string_with_retry(config.retry())?)
    } else {
        Ok(stamped.to_string())
    }
}

fn print_parsed<F: StampFormat>(stamped: &StampedName<F>, json: bool) -> anyhow::Result<()> {
    let output = ParsedOutput::from_stamped(stamped)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("file name: {}", output.file_name);
        println!("stamp:     {}", output.stamp);
        println!("counter:   {}", output.counter);
        println!(
            "placement: {}",
            if output.stamp_as_extension {
                "extension"
            } else {
                "suffix"
            }
        );
    }
    Ok(())
}

/// Main entry point for the stampfile CLI
///
/// Parses arguments, then loads `.env` if present, installs logging (`RUST_LOG` overrides
/// the default `stampfile=info`), resolves configuration and runs the requested command.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stampfile=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;

    match cli.command {
        Some(Commands::Format {
            file_name,
            kind,
            value,
            separator,
            extension,
            counter,
            retry,
        }) => {
            let formatted = match kind {
                StampKind::Date => {
                    let stamped = match value {
                        Some(v) => DateStampedName::new(file_name, parse_date(&v)?)?,
                        None => DateStampedName::today(file_name)?,
                    };
                    render(stamped, &config, separator, extension, counter, retry)?
                }
                StampKind::DateTime => {
                    let stamped = match value {
                        Some(v) => DateTimeStampedName::new(file_name, parse_date_time(&v)?)?,
                        None => DateTimeStampedName::now(file_name)?,
                    };
                    render(stamped, &config, separator, extension, counter, retry)?
                }
                StampKind::String => {
                    let value = value.context("--value is required for --kind string")?;
                    let stamped = StringStampedName::new(file_name, value)?;
                    render(stamped, &config, separator, extension, counter, retry)?
                }
            };
            println!("{}", formatted);
        }
        Some(Commands::Parse {
            path,
            kind,
            pattern,
            separator,
            json,
        }) => {
            let separator = separator.unwrap_or(config.separator());
            match kind {
                StampKind::Date => {
                    let stamped = StampedName::parse_with(DateFormat, &path, separator)?;
                    print_parsed(&stamped, json)?;
                }
                StampKind::DateTime => {
                    let stamped = StampedName::parse_with(DateTimeFormat, &path, separator)?;
                    print_parsed(&stamped, json)?;
                }
                StampKind::String => {
                    let pattern = pattern.context("--pattern is required for --kind string")?;
                    let stamped = StringStampedName::parse(&path, &pattern, separator)?;
                    print_parsed(&stamped, json)?;
                }
            }
        }
        Some(Commands::Organize {
            source,
            target,
            mode,
            wildcard,
            by,
            separator,
        }) => {
            let separator = separator.unwrap_or(config.separator());
            let organizer = FileOrganizer::new(&target, mode)?;
            let moved = match by {
                OrganizeBy::Created => organizer.organize_all(&source, &wildcard)?,
                OrganizeBy::DateStamp => {
                    organizer.organize_all_date_stamped(&source, &wildcard, separator)?
                }
                OrganizeBy::DateTimeStamp => {
                    organizer.organize_all_date_time_stamped(&source, &wildcard, separator)?
                }
            };
            tracing::info!("organized {} file(s) into {}", moved.len(), target.display());
            for path in moved {
                println!("{}", path.display());
            }
        }
        None => {
            println!("Use 'stampfile --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_parses_before_configuration() {
        // A bad environment value only fails when configuration is resolved.
        assert!(separator_from_env_value(Some("ab".into())).is_err());

        let err = Cli::try_parse_from(["stampfile", "--help"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let cli = Cli::try_parse_from(["stampfile", "parse", "a_20200101.txt", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Parse { json: true, .. })));
    }

    #[test]
    fn test_parse_date_arguments() {
        assert_eq!(
            parse_date("2020-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert!(parse_date("20200101").is_err());
        assert!(parse_date_time("2020-01-01T01:15:30").is_ok());
        assert!(parse_date_time("2020-01-01").is_err());
    }

    #[test]
    fn test_render_applies_flags() {
        let stamped =
            DateStampedName::new("FileName.ext", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
                .unwrap();
        let config = CoreConfig::default();

        let rendered = render(stamped, &config, Separator::new('-').ok(), true, 2, false).unwrap();
        assert_eq!(rendered, "FileName.ext.20200101-2");
    }

    #[test]
    fn test_parsed_output_json() {
        let stamped =
            DateTimeStampedName::parse("FileName.ext.20200101_011530", Separator::DEFAULT)
                .unwrap();
        let json = serde_json::to_value(ParsedOutput::from_stamped(&stamped).unwrap()).unwrap();

        assert_eq!(json["file_name"], "FileName.ext");
        assert_eq!(json["stamp"], "20200101_011530");
        assert_eq!(json["counter"], 0);
        assert_eq!(json["separator"], "_");
        assert_eq!(json["stamp_as_extension"], true);
    }
}
