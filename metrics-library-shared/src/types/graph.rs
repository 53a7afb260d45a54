//! Graph composition model.
//!
//! A [`Graph`] is an ordered list of [`Stack`]s; each stack holds ordered
//! [`OperationGroup`]s which combine an ordered list of [`Series`]. Order is
//! significant at every level and is preserved through serialization.
//!
//! `StackMode` and `OperGroupType` are closed sets: an unrecognized value is
//! rejected on decode instead of falling back to a default.

use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind, ItemMeta, LibraryItem};
use super::series_ref::SeriesRef;

/// How the stacks of a graph are drawn relative to each other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StackMode {
    #[default]
    None,
    Normal,
    Percent,
}

/// How the series of an operation group are combined.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperGroupType {
    /// Series are plotted individually.
    #[default]
    None,
    Avg,
    Sum,
}

/// A single plotted measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub name: String,
    pub origin: String,
    pub source: SeriesRef,
    pub metric: SeriesRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationGroup {
    pub name: String,

    #[serde(rename = "type", default)]
    pub group_type: OperGroupType,

    #[serde(default)]
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stack {
    pub name: String,

    #[serde(default)]
    pub groups: Vec<OperationGroup>,
}

/// A stored graph definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Graph {
    #[serde(flatten)]
    pub meta: ItemMeta,

    #[serde(default)]
    pub stack_mode: StackMode,

    #[serde(default)]
    pub stacks: Vec<Stack>,
}

impl Graph {
    /// Iterate over every series of the graph in declaration order.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.stacks
            .iter()
            .flat_map(|stack| stack.groups.iter())
            .flat_map(|group| group.series.iter())
    }
}

impl LibraryItem for Graph {
    fn meta(&self) -> &ItemMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ItemMeta {
        &mut self.meta
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Graph
    }

    fn into_item(self) -> Item {
        Item::Graph(self)
    }

    fn from_item(item: Item) -> Option<Self> {
        match item {
            Item::Graph(graph) => Some(graph),
            _ => None,
        }
    }
}
