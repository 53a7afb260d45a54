//! # Metrics Library Repository
//!
//! This crate holds the metrics library engine: the catalog index over the
//! Origin → Source → Metric hierarchy, one item store per library kind with a
//! pluggable persistence backend, source/metric group expansion and the
//! single-read cache for volatile graphs.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod expander;
pub mod interfaces;
pub mod pattern;
pub mod persistence;
pub mod service;
pub mod store;
pub mod volatile;

pub use catalog::{Catalog, CatalogIndex};
pub use config::{LibraryConfig, PersistenceSource};
pub use errors::LibraryError;
pub use expander::GroupExpander;
pub use interfaces::ItemPersistence;
pub use pattern::{NameFilter, Pattern};
pub use persistence::{FilePersistence, MockPersistence};
pub use service::{GraphLocation, Library};
pub use store::ItemStore;
pub use volatile::VolatileCache;
