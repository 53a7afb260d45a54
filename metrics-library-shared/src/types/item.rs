//! Library item metadata and the closed set of item kinds.
//!
//! Every stored item carries the same metadata block (`id`, `name`,
//! `description`, `modified`) and belongs to exactly one [`ItemKind`]. The
//! [`Item`] enum is the tagged form used when items are persisted; the
//! explicit `kind` discriminant selects the payload on decode.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::graph::Graph;
use super::group::Group;

/// The four kinds of library items. Each kind has its own ID namespace.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Graph,
    Collection,
    SourceGroup,
    MetricGroup,
}

impl ItemKind {
    /// All kinds, in a stable order.
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Graph,
        ItemKind::Collection,
        ItemKind::SourceGroup,
        ItemKind::MetricGroup,
    ];

    /// Plural name used in URL paths and as the persistence namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Graph => "graphs",
            ItemKind::Collection => "collections",
            ItemKind::SourceGroup => "sourcegroups",
            ItemKind::MetricGroup => "metricgroups",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata shared by every library item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemMeta {
    /// Server-assigned identifier. Ignored on create, immutable afterwards.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Time of the last successful write.
    #[serde(default)]
    pub modified: DateTime<Utc>,
}

impl ItemMeta {
    /// Create metadata for a not-yet-stored item.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Refresh `modified` to the current time.
    ///
    /// The timestamp never goes backwards and always moves forward by at least
    /// one microsecond, even when two writes land within the clock resolution.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.modified = if now > self.modified {
            now
        } else {
            self.modified + Duration::microseconds(1)
        };
    }

    /// Listing view of this item.
    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            modified: self.modified,
        }
    }
}

/// One entry of a library listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub modified: DateTime<Utc>,
}

/// A library item of any kind, tagged with its kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Graph(Graph),
    Collection(Collection),
    SourceGroup(Group),
    MetricGroup(Group),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Graph(_) => ItemKind::Graph,
            Item::Collection(_) => ItemKind::Collection,
            Item::SourceGroup(_) => ItemKind::SourceGroup,
            Item::MetricGroup(_) => ItemKind::MetricGroup,
        }
    }

    pub fn meta(&self) -> &ItemMeta {
        match self {
            Item::Graph(graph) => &graph.meta,
            Item::Collection(collection) => &collection.meta,
            Item::SourceGroup(group) | Item::MetricGroup(group) => &group.meta,
        }
    }
}

/// Behaviour shared by the concrete item payloads stored in the library.
///
/// Implemented by [`Graph`], [`Collection`] and [`Group`] so that a single
/// generic store can hold any of them.
pub trait LibraryItem: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    fn meta(&self) -> &ItemMeta;

    fn meta_mut(&mut self) -> &mut ItemMeta;

    /// The kind this value is stored as.
    fn kind(&self) -> ItemKind;

    /// Wrap this value into its tagged form.
    fn into_item(self) -> Item;

    /// Unwrap a tagged item, returning `None` if it holds another payload type.
    fn from_item(item: Item) -> Option<Self>;
}
