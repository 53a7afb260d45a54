//! Source and metric groups.
//!
//! A group is a named, ordered list of pattern rules. Each rule selects
//! catalog names (sources or metrics, depending on the group type) inside a
//! single origin.

use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind, ItemMeta, LibraryItem};

/// Which catalog dimension a group selects from. Fixed at creation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    #[default]
    Source,
    Metric,
}

impl GroupType {
    /// The library kind groups of this type are stored as.
    pub fn kind(&self) -> ItemKind {
        match self {
            GroupType::Source => ItemKind::SourceGroup,
            GroupType::Metric => ItemKind::MetricGroup,
        }
    }
}

/// One selection rule of a group.
///
/// `pattern` is either a literal name, a `glob:`-prefixed shell glob or a
/// `regexp:`-prefixed regular expression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupEntry {
    pub pattern: String,
    pub origin: String,
}

impl GroupEntry {
    pub fn new(pattern: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            origin: origin.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Group {
    #[serde(flatten)]
    pub meta: ItemMeta,

    #[serde(rename = "type", default)]
    pub group_type: GroupType,

    #[serde(default)]
    pub entries: Vec<GroupEntry>,
}

impl Group {
    pub fn new(name: impl Into<String>, group_type: GroupType, entries: Vec<GroupEntry>) -> Self {
        Self {
            meta: ItemMeta::new(name, ""),
            group_type,
            entries,
        }
    }
}

impl LibraryItem for Group {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ItemMeta {
        &mut self.meta
    }

    fn kind(&self) -> ItemKind {
        self.group_type.kind()
    }

    fn into_item(self) -> Item {
        match self.group_type {
            GroupType::Source => Item::SourceGroup(self),
            GroupType::Metric => Item::MetricGroup(self),
        }
    }

    fn from_item(item: Item) -> Option<Self> {
        match item {
            Item::SourceGroup(group) | Item::MetricGroup(group) => Some(group),
            _ => None,
        }
    }
}
