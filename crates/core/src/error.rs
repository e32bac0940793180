use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StampError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid file name: {0}")]
    Text(#[from] stampfile_types::TextError),
    #[error("invalid separator: {0}")]
    Separator(#[from] stampfile_types::SeparatorError),

    #[error("no stamp found in path: {path}")]
    StampNotFound { path: String },
    #[error("no stamp found in file name: {file_name}")]
    StampNotInFileName { file_name: String },
    #[error("malformed stamp '{text}': {source}")]
    MalformedStamp {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("malformed stamp counter '{0}'")]
    MalformedCounter(String),
    #[error("invalid stamp pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(
        "no free stamped name after {attempts} attempts (last candidate: {path})",
        path = .last_candidate.display()
    )]
    RetryLimitExceeded {
        last_candidate: PathBuf,
        attempts: u32,
    },
}

pub type StampResult<T> = std::result::Result<T, StampError>;
