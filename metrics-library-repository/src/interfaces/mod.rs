//! Interface definitions for the library persistence collaborator.
//!
//! This module defines the abstract `ItemPersistence` trait that allows
//! for dependency injection and swappable storage backends.

mod item_persistence;

pub use item_persistence::ItemPersistence;
