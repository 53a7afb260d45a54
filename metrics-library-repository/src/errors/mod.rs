//! Error types for the metrics library repository.
//!
//! This module provides a unified error type for all library operations.

mod library_error;

pub use library_error::LibraryError;
