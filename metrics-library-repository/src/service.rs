//! The library service.
//!
//! [`Library`] owns the catalog index, one item store per kind and the
//! volatile graph cache. It is built once at startup and shared by reference
//! with every request handler.

use std::sync::Arc;

use metrics_library_shared::{
    Collection, ExpandQuery, Graph, Group, GroupType, ItemKind, Triplet,
};
use tracing::info;

use crate::catalog::{Catalog, CatalogIndex};
use crate::config::LibraryConfig;
use crate::errors::LibraryError;
use crate::expander::GroupExpander;
use crate::interfaces::ItemPersistence;
use crate::pattern::Pattern;
use crate::store::ItemStore;
use crate::volatile::VolatileCache;

/// Where a created graph ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphLocation {
    Stored(String),
    Volatile(String),
}

impl GraphLocation {
    pub fn id(&self) -> &str {
        match self {
            GraphLocation::Stored(id) | GraphLocation::Volatile(id) => id,
        }
    }
}

fn validate_group_patterns(group: &Group) -> Result<(), LibraryError> {
    for entry in &group.entries {
        Pattern::compile(&entry.pattern)?;
    }
    Ok(())
}

/// The metrics library: catalog, item stores and volatile cache.
///
/// # Example
///
/// ```no_run
/// use metrics_library_repository::{Library, LibraryConfig};
/// use metrics_library_shared::{GroupType, ItemMeta, Graph};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let library = Library::open(LibraryConfig::filesystem("/var/lib/metrics-library")).await?;
///
/// let graph = Graph {
///     meta: ItemMeta::new("graph1", "CPU usage"),
///     ..Default::default()
/// };
/// let id = library.graphs().create(graph).await?;
/// let stored = library.graphs().get(&id).await?;
///
/// let metrics = library.expand_group("group1", GroupType::Metric).await?;
/// # Ok(())
/// # }
/// ```
pub struct Library {
    catalog: CatalogIndex,
    graphs: ItemStore<Graph>,
    collections: ItemStore<Collection>,
    source_groups: ItemStore<Group>,
    metric_groups: ItemStore<Group>,
    volatile: VolatileCache,
}

impl Library {
    /// Create an empty library on top of `persistence`.
    ///
    /// Nothing is read from the backend until [`Library::load`] is called.
    pub fn new(persistence: Arc<dyn ItemPersistence>) -> Self {
        Self {
            catalog: CatalogIndex::default(),
            graphs: ItemStore::new(ItemKind::Graph, persistence.clone()),
            collections: ItemStore::new(ItemKind::Collection, persistence.clone()),
            source_groups: ItemStore::new(ItemKind::SourceGroup, persistence.clone())
                .with_validator(validate_group_patterns),
            metric_groups: ItemStore::new(ItemKind::MetricGroup, persistence)
                .with_validator(validate_group_patterns),
            volatile: VolatileCache::new(),
        }
    }

    /// Build the configured backend and load every stored item from it.
    pub async fn open(config: LibraryConfig) -> Result<Self, LibraryError> {
        let persistence = config.persistence.into_persistence().await?;
        let library = Self::new(persistence);
        library.load().await?;
        Ok(library)
    }

    /// Load every item kind from persistence.
    pub async fn load(&self) -> Result<(), LibraryError> {
        let graphs = self.graphs.load().await?;
        let collections = self.collections.load().await?;
        let source_groups = self.source_groups.load().await?;
        let metric_groups = self.metric_groups.load().await?;

        info!(
            graphs,
            collections, source_groups, metric_groups, "Library loaded"
        );
        Ok(())
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    /// Replace the catalog hierarchy.
    pub fn refresh_catalog(&self, catalog: Catalog) {
        self.catalog.refresh(catalog);
    }

    pub fn graphs(&self) -> &ItemStore<Graph> {
        &self.graphs
    }

    pub fn collections(&self) -> &ItemStore<Collection> {
        &self.collections
    }

    pub fn source_groups(&self) -> &ItemStore<Group> {
        &self.source_groups
    }

    pub fn metric_groups(&self) -> &ItemStore<Group> {
        &self.metric_groups
    }

    /// The store holding groups of `group_type`.
    pub fn groups(&self, group_type: GroupType) -> &ItemStore<Group> {
        match group_type {
            GroupType::Source => &self.source_groups,
            GroupType::Metric => &self.metric_groups,
        }
    }

    pub fn volatile(&self) -> &VolatileCache {
        &self.volatile
    }

    pub fn expander(&self) -> GroupExpander<'_> {
        GroupExpander::new(&self.catalog, &self.source_groups, &self.metric_groups)
    }

    /// Create a graph, either durably or in the single-read volatile cache.
    pub async fn create_graph(
        &self,
        graph: Graph,
        volatile: bool,
    ) -> Result<GraphLocation, LibraryError> {
        if volatile {
            return Ok(GraphLocation::Volatile(self.volatile.put(graph)));
        }
        self.graphs.create(graph).await.map(GraphLocation::Stored)
    }

    /// Fetch a graph by ID.
    ///
    /// A pending volatile graph is returned (and consumed) before the durable
    /// store is consulted.
    pub async fn get_graph(&self, id: &str) -> Result<Graph, LibraryError> {
        match self.volatile.take_once(id) {
            Ok(graph) => Ok(graph),
            Err(_) => self.graphs.get(id).await,
        }
    }

    pub async fn expand_group(
        &self,
        name: &str,
        group_type: GroupType,
    ) -> Result<Vec<String>, LibraryError> {
        self.expander().expand_group(name, group_type).await
    }

    pub async fn expand_triplets(
        &self,
        queries: &[ExpandQuery],
    ) -> Result<Vec<Vec<Triplet>>, LibraryError> {
        self.expander().expand_triplets(queries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::persistence::MockPersistence;
    use metrics_library_shared::{GroupEntry, ItemMeta};

    fn library() -> Library {
        let library = Library::new(Arc::new(MockPersistence::new()));
        library.refresh_catalog(sample_catalog());
        library
    }

    #[tokio::test]
    async fn test_group_patterns_validated_on_write() {
        let library = library();
        let group = Group::new(
            "group1",
            GroupType::Metric,
            vec![GroupEntry::new("regexp:database[23", "test1")],
        );

        let err = library.metric_groups().create(group).await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput(_)));
        assert!(library.metric_groups().is_empty().await);
    }

    #[tokio::test]
    async fn test_groups_selects_store_by_type() {
        let library = library();
        assert_eq!(library.groups(GroupType::Source).kind(), ItemKind::SourceGroup);
        assert_eq!(library.groups(GroupType::Metric).kind(), ItemKind::MetricGroup);
    }

    #[tokio::test]
    async fn test_volatile_graph_read_once() {
        let library = library();
        let graph = Graph {
            meta: ItemMeta::new("preview", ""),
            ..Default::default()
        };

        let location = library.create_graph(graph, true).await.unwrap();
        assert!(matches!(location, GraphLocation::Volatile(_)));
        assert!(library.graphs().is_empty().await);

        let taken = library.get_graph(location.id()).await.unwrap();
        assert_eq!(taken.meta.name, "preview");
        assert!(library
            .get_graph(location.id())
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_durable_graph_read_repeatedly() {
        let library = library();
        let location = library
            .create_graph(Graph::default(), false)
            .await
            .unwrap();
        assert!(matches!(location, GraphLocation::Stored(_)));

        library.get_graph(location.id()).await.unwrap();
        library.get_graph(location.id()).await.unwrap();
    }

    #[tokio::test]
    async fn test_expand_unknown_group() {
        let library = library();
        let err = library
            .expand_group("group1", GroupType::Source)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_expand_group_uses_type_namespace() {
        let library = library();
        let group = Group::new(
            "group1",
            GroupType::Source,
            vec![GroupEntry::new("glob:source*", "test1")],
        );
        library.source_groups().create(group).await.unwrap();

        assert_eq!(
            library.expand_group("group1", GroupType::Source).await.unwrap(),
            vec!["source1", "source2"]
        );
        assert!(library
            .expand_group("group1", GroupType::Metric)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
