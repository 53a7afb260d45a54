//! Collections of graphs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind, ItemMeta, LibraryItem};

/// A graph placed in a collection, with its rendering options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionEntry {
    /// ID of the referenced graph.
    pub id: String,

    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// An ordered list of graphs, optionally nested under a parent collection
/// for display purposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    #[serde(flatten)]
    pub meta: ItemMeta,

    #[serde(default)]
    pub entries: Vec<CollectionEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl LibraryItem for Collection {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ItemMeta {
        &mut self.meta
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Collection
    }

    fn into_item(self) -> Item {
        Item::Collection(self)
    }

    fn from_item(item: Item) -> Option<Self> {
        match item {
            Item::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}
