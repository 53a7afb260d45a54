//! # Metrics Library Shared
//!
//! This crate defines the data structures shared across the metrics library:
//! catalog lookup responses, the library item variants (graphs, collections,
//! source groups and metric groups), the graph composition model and the
//! small value types used for pagination and group expansion.

pub mod types;

pub use types::catalog::{MetricInfo, SourceInfo};
pub use types::collection::{Collection, CollectionEntry};
pub use types::expand::{ExpandQuery, Triplet};
pub use types::graph::{Graph, OperGroupType, OperationGroup, Series, Stack, StackMode};
pub use types::group::{Group, GroupEntry, GroupType};
pub use types::item::{Item, ItemKind, ItemMeta, ItemSummary, LibraryItem};
pub use types::page::Page;
pub use types::series_ref::{SeriesRef, GROUP_PREFIX};
