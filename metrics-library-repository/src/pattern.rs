//! Group entry patterns and listing filters.
//!
//! A group entry pattern is one of:
//!
//! - a literal name, matched by exact string equality
//! - `glob:<glob>`: shell glob (`*`, `?`, `[...]` classes), matched against the whole name
//! - `regexp:<regex>`: regular expression, matched against the whole name
//!
//! Listing filters accept the same prefixed forms; an unprefixed filter is a
//! substring match instead of an exact one.

use regex::Regex;

use crate::errors::LibraryError;

pub const GLOB_PREFIX: &str = "glob:";
pub const REGEXP_PREFIX: &str = "regexp:";

/// A compiled group entry pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Glob(glob::Pattern),
    Regex(Regex),
}

impl Pattern {
    /// Compile a raw pattern string.
    ///
    /// # Returns
    ///
    /// * `Ok(Pattern)` - The compiled pattern
    /// * `Err(LibraryError::InvalidInput)` - If a glob or regular expression does not compile
    pub fn compile(raw: &str) -> Result<Self, LibraryError> {
        if let Some(expr) = raw.strip_prefix(GLOB_PREFIX) {
            return glob::Pattern::new(expr).map(Pattern::Glob).map_err(|e| {
                LibraryError::invalid_input(format!("invalid glob pattern {:?}: {}", expr, e))
            });
        }

        if let Some(expr) = raw.strip_prefix(REGEXP_PREFIX) {
            return Regex::new(&format!("^(?:{})$", expr))
                .map(Pattern::Regex)
                .map_err(|e| {
                    LibraryError::invalid_input(format!(
                        "invalid regular expression {:?}: {}",
                        expr, e
                    ))
                });
        }

        Ok(Pattern::Literal(raw.to_string()))
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            Pattern::Literal(name) => name == candidate,
            Pattern::Glob(pattern) => pattern.matches(candidate),
            Pattern::Regex(regex) => regex.is_match(candidate),
        }
    }
}

/// A compiled name filter for listings.
#[derive(Debug, Clone)]
pub enum NameFilter {
    Substring(String),
    Pattern(Pattern),
}

impl NameFilter {
    pub fn parse(raw: &str) -> Result<Self, LibraryError> {
        if raw.starts_with(GLOB_PREFIX) || raw.starts_with(REGEXP_PREFIX) {
            Pattern::compile(raw).map(NameFilter::Pattern)
        } else {
            Ok(NameFilter::Substring(raw.to_string()))
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            NameFilter::Substring(needle) => name.contains(needle.as_str()),
            NameFilter::Pattern(pattern) => pattern.is_match(name),
        }
    }
}

/// Match helper for optional filters: no filter accepts every name.
pub(crate) fn filter_accepts(filter: Option<&NameFilter>, name: &str) -> bool {
    filter.map_or(true, |filter| filter.is_match(name))
}
