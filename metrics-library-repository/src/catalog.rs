//! Catalog index: the Origin → Source → Metric hierarchy.
//!
//! The hierarchy is held as an immutable [`Catalog`] snapshot behind an
//! `RwLock<Arc<_>>`. Readers take the lock only long enough to clone the
//! `Arc` and then work on a consistent snapshot; a refresh replaces the
//! whole snapshot in a single swap, so no reader ever observes a partially
//! updated hierarchy.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use metrics_library_shared::{MetricInfo, Page, SourceInfo};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::LibraryError;
use crate::pattern::{filter_accepts, NameFilter};

/// An immutable view of the catalog hierarchy.
///
/// Serialized as `{"origin": {"source": ["metric", ...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    origins: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `origin` carries `metric` under `source`.
    pub fn insert(
        &mut self,
        origin: impl Into<String>,
        source: impl Into<String>,
        metric: impl Into<String>,
    ) {
        self.insert_source(origin, source).insert(metric.into());
    }

    /// Record a source, possibly without any metric yet.
    pub fn insert_source(
        &mut self,
        origin: impl Into<String>,
        source: impl Into<String>,
    ) -> &mut BTreeSet<String> {
        self.origins
            .entry(origin.into())
            .or_default()
            .entry(source.into())
            .or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    /// Number of distinct source names across all origins.
    pub fn source_count(&self) -> usize {
        self.all_sources().len()
    }

    /// Number of distinct metric names across all origins.
    pub fn metric_count(&self) -> usize {
        self.all_metrics(None).len()
    }

    /// Source names under one origin, sorted. Unknown origins yield nothing.
    pub fn source_names(&self, origin: &str) -> Vec<String> {
        self.origins
            .get(origin)
            .map(|sources| sources.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Metric names under one origin across all of its sources, sorted and de-duplicated.
    pub fn metric_names(&self, origin: &str) -> Vec<String> {
        self.origins
            .get(origin)
            .map(|sources| {
                sources
                    .values()
                    .flatten()
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn all_sources(&self) -> BTreeSet<&str> {
        self.origins
            .values()
            .flat_map(|sources| sources.keys())
            .map(String::as_str)
            .collect()
    }

    fn all_metrics(&self, source: Option<&str>) -> BTreeSet<&str> {
        self.origins
            .values()
            .flat_map(|sources| sources.iter())
            .filter(|(name, _)| source.map_or(true, |source| source == name.as_str()))
            .flat_map(|(_, metrics)| metrics.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Shared, read-mostly index over the current catalog snapshot.
pub struct CatalogIndex {
    snapshot: RwLock<Arc<Catalog>>,
}

impl CatalogIndex {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Replace the whole hierarchy.
    pub fn refresh(&self, catalog: Catalog) {
        let origins = catalog.origin_count();
        let sources = catalog.source_count();
        let metrics = catalog.metric_count();

        let catalog = Arc::new(catalog);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = catalog;

        info!(origins, sources, metrics, "Catalog refreshed");
    }

    /// The current snapshot. Later refreshes do not affect it.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// List origin names, sorted.
    pub fn list_origins(&self, filter: Option<&NameFilter>, page: Page) -> Vec<String> {
        let catalog = self.snapshot();
        page.apply(
            catalog
                .origins
                .keys()
                .filter(|name| filter_accepts(filter, name))
                .cloned(),
        )
    }

    /// List source names across all origins, sorted and de-duplicated.
    pub fn list_sources(&self, filter: Option<&NameFilter>, page: Page) -> Vec<String> {
        let catalog = self.snapshot();
        page.apply(
            catalog
                .all_sources()
                .into_iter()
                .filter(|name| filter_accepts(filter, name))
                .map(str::to_string),
        )
    }

    /// Which origins carry a source name.
    pub fn get_source(&self, name: &str) -> Result<SourceInfo, LibraryError> {
        let catalog = self.snapshot();
        let origins: Vec<String> = catalog
            .origins
            .iter()
            .filter(|(_, sources)| sources.contains_key(name))
            .map(|(origin, _)| origin.clone())
            .collect();

        if origins.is_empty() {
            return Err(LibraryError::not_found(format!("source {}", name)));
        }

        Ok(SourceInfo {
            name: name.to_string(),
            origins,
        })
    }

    /// List metric names, sorted and de-duplicated across origins.
    ///
    /// With `source`, only metrics carried by a source of that name (in any
    /// origin) are listed; the global sort order is kept.
    pub fn list_metrics(
        &self,
        source: Option<&str>,
        filter: Option<&NameFilter>,
        page: Page,
    ) -> Vec<String> {
        let catalog = self.snapshot();
        page.apply(
            catalog
                .all_metrics(source)
                .into_iter()
                .filter(|name| filter_accepts(filter, name))
                .map(str::to_string),
        )
    }

    /// Which sources and origins carry a metric name.
    pub fn get_metric(&self, name: &str) -> Result<MetricInfo, LibraryError> {
        let catalog = self.snapshot();
        let mut sources = BTreeSet::new();
        let mut origins = Vec::new();

        for (origin, origin_sources) in &catalog.origins {
            let mut carried = false;
            for (source, metrics) in origin_sources {
                if metrics.contains(name) {
                    sources.insert(source.clone());
                    carried = true;
                }
            }
            if carried {
                origins.push(origin.clone());
            }
        }

        if origins.is_empty() {
            return Err(LibraryError::not_found(format!("metric {}", name)));
        }

        Ok(MetricInfo {
            name: name.to_string(),
            sources: sources.into_iter().collect(),
            origins,
        })
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new(Catalog::new())
    }
}
