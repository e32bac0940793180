/// Wildcard matching every file.
pub const DEFAULT_WILDCARD: &str = "*";
