//! Resolution of stored groups into concrete catalog names.

use std::collections::HashSet;

use metrics_library_shared::{ExpandQuery, Group, GroupEntry, GroupType, SeriesRef, Triplet};
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogIndex};
use crate::errors::LibraryError;
use crate::pattern::Pattern;
use crate::store::ItemStore;

/// Expands source and metric groups against the current catalog.
///
/// Expansion is read-only: it never mutates the stores or the catalog.
pub struct GroupExpander<'a> {
    catalog: &'a CatalogIndex,
    source_groups: &'a ItemStore<Group>,
    metric_groups: &'a ItemStore<Group>,
}

impl<'a> GroupExpander<'a> {
    pub fn new(
        catalog: &'a CatalogIndex,
        source_groups: &'a ItemStore<Group>,
        metric_groups: &'a ItemStore<Group>,
    ) -> Self {
        Self {
            catalog,
            source_groups,
            metric_groups,
        }
    }

    async fn find_group(&self, name: &str, group_type: GroupType) -> Result<Group, LibraryError> {
        let store = match group_type {
            GroupType::Source => self.source_groups,
            GroupType::Metric => self.metric_groups,
        };
        store.find_by_name(name).await.ok_or_else(|| {
            LibraryError::not_found(format!("{} {}", group_type.kind(), name))
        })
    }

    /// Expand the group named `name` into distinct catalog names.
    ///
    /// # Returns
    ///
    /// * `Ok(names)` - Matches in entry order, first occurrence wins
    /// * `Err(LibraryError::NotFound)` - If no group of that type has this name
    /// * `Err(LibraryError::InvalidInput)` - If an entry pattern does not compile
    pub async fn expand_group(
        &self,
        name: &str,
        group_type: GroupType,
    ) -> Result<Vec<String>, LibraryError> {
        let group = self.find_group(name, group_type).await?;
        let catalog = self.catalog.snapshot();
        let names = expand_entries(&catalog, &group.entries, group_type)?;

        debug!(group = %name, group_type = ?group_type, matches = names.len(), "Expanded group");
        Ok(names)
    }

    async fn expand_ref(
        &self,
        reference: &SeriesRef,
        group_type: GroupType,
    ) -> Result<Vec<String>, LibraryError> {
        match reference {
            SeriesRef::Literal(name) => Ok(vec![name.clone()]),
            SeriesRef::Group(name) => match self.expand_group(name, group_type).await {
                Err(LibraryError::NotFound(_)) => {
                    warn!(group = %name, group_type = ?group_type, "Expanding unknown group to nothing");
                    Ok(Vec::new())
                }
                result => result,
            },
        }
    }

    /// Expand each query into its sorted group of concrete triplets.
    ///
    /// Output groups follow input order. Within a group, when both source and
    /// metric are group references the product is built with the source
    /// varying slower, then the whole group is sorted. A reference to a group
    /// that does not exist contributes an empty group; invalid patterns still
    /// fail the whole call.
    pub async fn expand_triplets(
        &self,
        queries: &[ExpandQuery],
    ) -> Result<Vec<Vec<Triplet>>, LibraryError> {
        let mut result = Vec::with_capacity(queries.len());

        for query in queries {
            let sources = self.expand_ref(query.source(), GroupType::Source).await?;
            let metrics = self.expand_ref(query.metric(), GroupType::Metric).await?;

            let mut triplets: Vec<Triplet> = sources
                .iter()
                .flat_map(|source| {
                    metrics
                        .iter()
                        .map(move |metric| Triplet::new(query.origin(), source.clone(), metric.clone()))
                })
                .collect();
            triplets.sort();

            result.push(triplets);
        }

        Ok(result)
    }
}

/// Resolve group entries against one catalog snapshot.
///
/// Every pattern is compiled before any is evaluated, so an invalid entry
/// fails the whole expansion.
pub fn expand_entries(
    catalog: &Catalog,
    entries: &[GroupEntry],
    group_type: GroupType,
) -> Result<Vec<String>, LibraryError> {
    let compiled = entries
        .iter()
        .map(|entry| Pattern::compile(&entry.pattern).map(|pattern| (pattern, entry.origin.as_str())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (pattern, origin) in compiled {
        let candidates = match group_type {
            GroupType::Source => catalog.source_names(origin),
            GroupType::Metric => catalog.metric_names(origin),
        };

        for candidate in candidates {
            if pattern.is_match(&candidate) && seen.insert(candidate.clone()) {
                names.push(candidate);
            }
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use metrics_library_shared::ItemKind;

    use crate::catalog::tests::sample_catalog;
    use crate::persistence::MockPersistence;

    #[test]
    fn test_glob_source_entry() {
        let entries = vec![GroupEntry::new("glob:source*", "test1")];
        let names = expand_entries(&sample_catalog(), &entries, GroupType::Source).unwrap();
        assert_eq!(names, vec!["source1", "source2"]);
    }

    #[test]
    fn test_literal_then_regexp_keeps_first_seen_order() {
        let entries = vec![
            GroupEntry::new("database3/test", "test1"),
            GroupEntry::new("regexp:database[23]/test", "test1"),
        ];
        let names = expand_entries(&sample_catalog(), &entries, GroupType::Metric).unwrap();
        assert_eq!(names, vec!["database3/test", "database2/test"]);
    }

    #[test]
    fn test_entries_restricted_to_origin() {
        let entries = vec![GroupEntry::new("glob:*", "test2")];
        let names = expand_entries(&sample_catalog(), &entries, GroupType::Source).unwrap();
        assert_eq!(names, vec!["source1", "source3"]);

        let entries = vec![GroupEntry::new("glob:*", "unknown")];
        assert!(expand_entries(&sample_catalog(), &entries, GroupType::Source)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_literal_must_exist_in_catalog() {
        let entries = vec![GroupEntry::new("database9/test", "test1")];
        assert!(expand_entries(&sample_catalog(), &entries, GroupType::Metric)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_pattern_fails_before_matching() {
        let entries = vec![
            GroupEntry::new("database1/test", "test1"),
            GroupEntry::new("regexp:database[23", "test1"),
        ];
        let err = expand_entries(&sample_catalog(), &entries, GroupType::Metric).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_triplets_fail_on_invalid_stored_pattern() {
        let catalog = CatalogIndex::new(sample_catalog());
        let source_groups = ItemStore::new(ItemKind::SourceGroup, Arc::new(MockPersistence::new()));
        // No validator, so the broken pattern reaches the store.
        let metric_groups = ItemStore::new(ItemKind::MetricGroup, Arc::new(MockPersistence::new()));
        metric_groups
            .create(Group::new(
                "broken",
                GroupType::Metric,
                vec![GroupEntry::new("regexp:database[23", "test1")],
            ))
            .await
            .unwrap();

        let expander = GroupExpander::new(&catalog, &source_groups, &metric_groups);
        let err = expander
            .expand_triplets(&[
                ExpandQuery::new("test1", "source1", "group:missing"),
                ExpandQuery::new("test1", "source1", "group:broken"),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput(_)));
    }
}
