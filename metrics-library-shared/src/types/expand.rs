//! Bulk reference expansion types.
//!
//! Both types travel as three-element JSON arrays:
//! `["origin", "source", "metric"]`.

use serde::{Deserialize, Serialize};

use super::series_ref::SeriesRef;

/// An `(origin, source, metric)` query whose source and metric may be group references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandQuery(pub String, pub SeriesRef, pub SeriesRef);

impl ExpandQuery {
    pub fn new(
        origin: impl Into<String>,
        source: impl Into<SeriesRef>,
        metric: impl Into<SeriesRef>,
    ) -> Self {
        Self(origin.into(), source.into(), metric.into())
    }

    pub fn origin(&self) -> &str {
        &self.0
    }

    pub fn source(&self) -> &SeriesRef {
        &self.1
    }

    pub fn metric(&self) -> &SeriesRef {
        &self.2
    }
}

/// A fully resolved `(origin, source, metric)` triplet.
///
/// Ordering is lexicographic by origin, then source, then metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triplet(pub String, pub String, pub String);

impl Triplet {
    pub fn new(
        origin: impl Into<String>,
        source: impl Into<String>,
        metric: impl Into<String>,
    ) -> Self {
        Self(origin.into(), source.into(), metric.into())
    }

    pub fn origin(&self) -> &str {
        &self.0
    }

    pub fn source(&self) -> &str {
        &self.1
    }

    pub fn metric(&self) -> &str {
        &self.2
    }
}
