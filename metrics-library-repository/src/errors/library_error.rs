//! Library error types.
//!
//! This module defines the unified error type for catalog lookups, item
//! store operations, group expansion and the volatile cache.

use thiserror::Error;

/// Unified errors from library operations.
///
/// Returned by the item store, the catalog index, the group expander and the
/// persistence backends. The transport layer maps each variant to a response
/// status; none of them is fatal to the process.
#[derive(Debug, Clone, Error)]
pub enum LibraryError {
    /// Unknown item ID, group name or catalog name.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed payload, unparseable pattern or mismatched item kind.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The persistence backend failed to save, load or delete an item.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LibraryError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a persistence error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a not found error for an item of the given kind.
    pub fn item_not_found(kind: impl std::fmt::Display, id: &str) -> Self {
        Self::NotFound(format!("{} item {}", kind, id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}
