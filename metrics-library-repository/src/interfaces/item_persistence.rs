//! Item persistence trait definition.
//!
//! This module defines the abstract interface the item store uses to make
//! writes durable, allowing for different backends (in-memory, JSON files).

use async_trait::async_trait;
use metrics_library_shared::{Item, ItemKind};

use crate::errors::LibraryError;

/// Abstracts where library items are durably kept.
///
/// Implementations are injected into the item stores at startup. Each call
/// is assumed to be atomic for a single item; there are no cross-item
/// transactions.
#[async_trait]
pub trait ItemPersistence: Send + Sync {
    /// Save an item, replacing any previous record with the same kind and ID.
    async fn save(&self, item: &Item) -> Result<(), LibraryError>;

    /// Load every stored item of a kind. Used to warm the stores at startup.
    async fn load_all(&self, kind: ItemKind) -> Result<Vec<Item>, LibraryError>;

    /// Delete an item. Deleting a missing record is not an error.
    async fn delete(&self, kind: ItemKind, id: &str) -> Result<(), LibraryError>;
}
