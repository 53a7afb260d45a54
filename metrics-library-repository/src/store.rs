//! Per-kind item collections.
//!
//! Each [`ItemStore`] owns the items of a single kind behind its own lock, so
//! operations on different kinds never contend. Writes hold the write lock
//! across the persistence call: the in-memory view only changes once the
//! record is durable.

use std::collections::BTreeMap;
use std::sync::Arc;

use metrics_library_shared::{ItemKind, ItemSummary, LibraryItem, Page};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::LibraryError;
use crate::interfaces::ItemPersistence;
use crate::pattern::{filter_accepts, NameFilter};

/// Extra checks run on every write before the item is persisted.
pub type Validator<T> = fn(&T) -> Result<(), LibraryError>;

/// The collection of one item kind.
pub struct ItemStore<T: LibraryItem> {
    kind: ItemKind,
    items: RwLock<BTreeMap<String, T>>,
    persistence: Arc<dyn ItemPersistence>,
    validator: Option<Validator<T>>,
}

impl<T: LibraryItem> ItemStore<T> {
    /// Create an empty store for `kind`.
    ///
    /// # Arguments
    ///
    /// * `kind` - The item kind this store holds; writes of any other kind are rejected
    /// * `persistence` - The backend every write is made durable through
    pub fn new(kind: ItemKind, persistence: Arc<dyn ItemPersistence>) -> Self {
        Self {
            kind,
            items: RwLock::new(BTreeMap::new()),
            persistence,
            validator: None,
        }
    }

    /// Run `validator` on every create and update.
    pub fn with_validator(mut self, validator: Validator<T>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Load every persisted item of this kind, replacing the in-memory view.
    ///
    /// # Returns
    ///
    /// The number of items loaded.
    pub async fn load(&self) -> Result<usize, LibraryError> {
        let loaded = self.persistence.load_all(self.kind).await?;

        let mut items = self.items.write().await;
        items.clear();
        for item in loaded {
            let id = item.meta().id.clone();
            match T::from_item(item) {
                Some(item) if item.kind() == self.kind => {
                    items.insert(id, item);
                }
                _ => {
                    return Err(LibraryError::serialization(format!(
                        "persisted record {} is not a {} item",
                        id, self.kind
                    )));
                }
            }
        }

        info!(kind = %self.kind, count = items.len(), "Loaded library items");
        Ok(items.len())
    }

    fn check(&self, item: &T) -> Result<(), LibraryError> {
        if item.kind() != self.kind {
            return Err(LibraryError::invalid_input(format!(
                "{} item cannot be stored as {}",
                item.kind(),
                self.kind
            )));
        }
        match self.validator {
            Some(validate) => validate(item),
            None => Ok(()),
        }
    }

    /// Store a new item under a fresh ID. Any caller-supplied ID is ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(id)` - The assigned ID
    /// * `Err(LibraryError::InvalidInput)` - If the item fails validation
    /// * `Err(LibraryError::PersistenceError)` - If the backend failed; nothing is stored
    pub async fn create(&self, mut item: T) -> Result<String, LibraryError> {
        self.check(&item)?;

        let mut items = self.items.write().await;
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !items.contains_key(&candidate) {
                break candidate;
            }
        };

        let meta = item.meta_mut();
        meta.id = id.clone();
        meta.touch();

        self.persistence.save(&item.clone().into_item()).await?;
        items.insert(id.clone(), item);

        info!(kind = %self.kind, id = %id, "Created library item");
        Ok(id)
    }

    /// Create a new item seeded from an existing one.
    ///
    /// The source item is copied, its ID dropped, and every top-level field
    /// present in `patch` replaces the copied value. The result is stored
    /// under a fresh ID exactly like [`ItemStore::create`].
    pub async fn create_inherited(&self, source_id: &str, patch: Value) -> Result<String, LibraryError> {
        let source = self.get(source_id).await?;

        let Value::Object(patch) = patch else {
            return Err(LibraryError::invalid_input("item payload must be a JSON object"));
        };

        let mut merged = match serde_json::to_value(&source) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                return Err(LibraryError::serialization(format!(
                    "{} item {} does not encode as an object",
                    self.kind, source_id
                )))
            }
            Err(e) => return Err(LibraryError::serialization(e.to_string())),
        };
        merged.extend(patch);
        merged.remove("id");

        let item: T = serde_json::from_value(Value::Object(merged))
            .map_err(|e| LibraryError::invalid_input(e.to_string()))?;

        debug!(kind = %self.kind, source_id = %source_id, "Creating item from existing one");
        self.create(item).await
    }

    /// Fetch an item by ID.
    pub async fn get(&self, id: &str) -> Result<T, LibraryError> {
        self.items
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| LibraryError::item_not_found(self.kind, id))
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.items.read().await.contains_key(id)
    }

    /// Replace an existing item.
    ///
    /// The stored ID is kept whatever the payload says, and `modified` moves
    /// strictly forward from the previous value.
    pub async fn update(&self, id: &str, mut item: T) -> Result<(), LibraryError> {
        self.check(&item)?;

        let mut items = self.items.write().await;
        let previous = items
            .get(id)
            .ok_or_else(|| LibraryError::item_not_found(self.kind, id))?;

        let meta = item.meta_mut();
        meta.id = id.to_string();
        meta.modified = previous.meta().modified;
        meta.touch();

        self.persistence.save(&item.clone().into_item()).await?;
        items.insert(id.to_string(), item);

        info!(kind = %self.kind, id = %id, "Updated library item");
        Ok(())
    }

    /// Remove an item. Its ID is never handed out again.
    pub async fn delete(&self, id: &str) -> Result<(), LibraryError> {
        let mut items = self.items.write().await;
        if !items.contains_key(id) {
            return Err(LibraryError::item_not_found(self.kind, id));
        }

        self.persistence.delete(self.kind, id).await?;
        items.remove(id);

        info!(kind = %self.kind, id = %id, "Deleted library item");
        Ok(())
    }

    /// List items sorted by name (then ID), filtered by name, then paginated.
    pub async fn list(&self, filter: Option<&NameFilter>, page: Page) -> Vec<ItemSummary> {
        let items = self.items.read().await;
        let mut summaries: Vec<ItemSummary> = items
            .values()
            .map(|item| item.meta())
            .filter(|meta| filter_accepts(filter, &meta.name))
            .map(|meta| meta.summary())
            .collect();
        drop(items);

        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        page.apply(summaries)
    }

    /// The first item named exactly `name`, in listing order.
    pub async fn find_by_name(&self, name: &str) -> Option<T> {
        self.items
            .read()
            .await
            .values()
            .filter(|item| item.meta().name == name)
            .min_by(|a, b| a.meta().id.cmp(&b.meta().id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
