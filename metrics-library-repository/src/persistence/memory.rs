use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use metrics_library_shared::{Item, ItemKind};

use crate::errors::LibraryError;
use crate::interfaces::ItemPersistence;

/// In-memory persistence backend for testing/development.
///
/// Nothing survives a restart.
pub struct MockPersistence {
    items: RwLock<HashMap<(ItemKind, String), Item>>,
}

impl MockPersistence {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored records across all kinds.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemPersistence for MockPersistence {
    async fn save(&self, item: &Item) -> Result<(), LibraryError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert((item.kind(), item.meta().id.clone()), item.clone());
        Ok(())
    }

    async fn load_all(&self, kind: ItemKind) -> Result<Vec<Item>, LibraryError> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items
            .iter()
            .filter(|((item_kind, _), _)| *item_kind == kind)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn delete(&self, kind: ItemKind, id: &str) -> Result<(), LibraryError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.remove(&(kind, id.to_string()));
        Ok(())
    }
}
