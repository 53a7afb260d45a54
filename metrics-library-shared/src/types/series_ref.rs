//! Source and metric references carried by series and expansion queries.
//!
//! On the wire a reference is a plain string; a `group:` prefix marks a
//! reference to a stored group. The string is decoded once into a
//! [`SeriesRef`] and re-encoded unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix marking a reference to a source or metric group.
pub const GROUP_PREFIX: &str = "group:";

/// A literal catalog name or a reference to a named group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeriesRef {
    Literal(String),
    Group(String),
}

impl SeriesRef {
    pub fn parse(value: &str) -> Self {
        match value.strip_prefix(GROUP_PREFIX) {
            Some(name) => SeriesRef::Group(name.to_string()),
            None => SeriesRef::Literal(value.to_string()),
        }
    }

    /// The group name, if this is a group reference.
    pub fn group_name(&self) -> Option<&str> {
        match self {
            SeriesRef::Group(name) => Some(name),
            SeriesRef::Literal(_) => None,
        }
    }

    /// The referenced name without any prefix.
    pub fn name(&self) -> &str {
        match self {
            SeriesRef::Literal(name) | SeriesRef::Group(name) => name,
        }
    }
}

impl fmt::Display for SeriesRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesRef::Literal(name) => f.write_str(name),
            SeriesRef::Group(name) => write!(f, "{}{}", GROUP_PREFIX, name),
        }
    }
}

impl From<String> for SeriesRef {
    fn from(value: String) -> Self {
        SeriesRef::parse(&value)
    }
}

impl From<&str> for SeriesRef {
    fn from(value: &str) -> Self {
        SeriesRef::parse(value)
    }
}

impl From<SeriesRef> for String {
    fn from(value: SeriesRef) -> Self {
        value.to_string()
    }
}
