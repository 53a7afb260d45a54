//! This module defines the core data structures used across the metrics library.
//! Item variants live in their own submodules and share the metadata block from [`item`].

pub mod catalog;
pub mod collection;
pub mod expand;
pub mod graph;
pub mod group;
pub mod item;
pub mod page;
pub mod series_ref;
