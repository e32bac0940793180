//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core operations.
//! Nothing in this crate reads environment variables while formatting or parsing names.

use crate::constants::DEFAULT_MAX_RETRY_ATTEMPTS;
use crate::{StampError, StampResult};
use stampfile_types::Separator;

/// Bound on the collision-avoiding retry loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Create a policy trying at most `max_attempts` candidate names.
    pub fn new(max_attempts: u32) -> StampResult<Self> {
        if max_attempts == 0 {
            return Err(StampError::InvalidInput(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(Self { max_attempts })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    separator: Separator,
    stamp_as_extension: bool,
    retry: RetryPolicy,
}

impl CoreConfig {
    pub fn new(separator: Separator, stamp_as_extension: bool, retry: RetryPolicy) -> Self {
        Self {
            separator,
            stamp_as_extension,
            retry,
        }
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn stamp_as_extension(&self) -> bool {
        self.stamp_as_extension
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the separator from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`Separator::DEFAULT`].
pub fn separator_from_env_value(value: Option<String>) -> StampResult<Separator> {
    let parsed = non_blank(value)
        .map(|v| v.parse::<Separator>())
        .transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Parse the retry ceiling from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn retry_policy_from_env_value(value: Option<String>) -> StampResult<RetryPolicy> {
    match non_blank(value) {
        None => Ok(RetryPolicy::default()),
        Some(v) => {
            let attempts = v.parse::<u32>().map_err(|e| {
                StampError::InvalidInput(format!("invalid retry attempt count '{}': {}", v, e))
            })?;
            RetryPolicy::new(attempts)
        }
    }
}

/// Parse the placement flag from an optional string value.
///
/// Accepts `true`/`false`, `1`/`0` and `yes`/`no`; missing or blank means `false`.
pub fn stamp_as_extension_from_env_value(value: Option<String>) -> StampResult<bool> {
    match non_blank(value).map(|v| v.to_ascii_lowercase()).as_deref() {
        None | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => Err(StampError::InvalidInput(format!(
            "invalid stamp placement flag '{}'",
            other
        ))),
    }
}
