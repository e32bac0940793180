use crate::{OrganizeError, OrganizeResult};
use regex::Regex;

/// A file-name wildcard: `*` matches any run of characters, `?` matches one character.
///
/// `*.*` matches every file, including names without a dot.
#[derive(Clone, Debug)]
pub struct Wildcard {
    source: String,
    regex: Regex,
}

impl Wildcard {
    pub fn new(source: &str) -> OrganizeResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(OrganizeError::InvalidWildcard(
                "wildcard cannot be empty".into(),
            ));
        }

        let mut pattern = String::from("(?s)^");
        if source == "*.*" {
            pattern.push_str(".*");
        } else {
            for c in source.chars() {
                match c {
                    '*' => pattern.push_str(".*"),
                    '?' => pattern.push('.'),
                    _ => pattern.push_str(&regex::escape(&c.to_string())),
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| OrganizeError::InvalidWildcard(format!("{}: {}", source, e)))?;

        Ok(Self {
            source: source.to_owned(),
            regex,
        })
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}
