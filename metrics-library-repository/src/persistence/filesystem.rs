//! JSON file persistence.
//!
//! Items are stored as `<root>/<kind>/<id>.json`. A save writes a temporary
//! file next to the target and renames it over the previous record, so a
//! reader never observes a half-written item.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use metrics_library_shared::{Item, ItemKind};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::LibraryError;
use crate::interfaces::ItemPersistence;

const RECORD_EXTENSION: &str = "json";

/// File-backed persistence rooted at a data directory.
pub struct FilePersistence {
    root: PathBuf,
}

impl FilePersistence {
    /// Open (and create if needed) the data directory and one subdirectory per item kind.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let root = root.into();
        for kind in ItemKind::ALL {
            fs::create_dir_all(root.join(kind.as_str())).await?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, kind: ItemKind, id: &str) -> Result<PathBuf, LibraryError> {
        if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
            return Err(LibraryError::invalid_input(format!(
                "invalid item id: {:?}",
                id
            )));
        }
        Ok(self
            .root
            .join(kind.as_str())
            .join(format!("{}.{}", id, RECORD_EXTENSION)))
    }

    async fn read_record(path: &Path) -> Result<Option<Item>, LibraryError> {
        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&data).map(Some).map_err(|e| {
            LibraryError::serialization(format!("{}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl ItemPersistence for FilePersistence {
    async fn save(&self, item: &Item) -> Result<(), LibraryError> {
        let path = self.record_path(item.kind(), &item.meta().id)?;
        let data = serde_json::to_vec_pretty(item)
            .map_err(|e| LibraryError::serialization(e.to_string()))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, data).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!(kind = %item.kind(), id = %item.meta().id, path = %path.display(), "Saved library item");
        Ok(())
    }

    async fn load_all(&self, kind: ItemKind) -> Result<Vec<Item>, LibraryError> {
        let dir = self.root.join(kind.as_str());
        let mut entries = fs::read_dir(&dir).await?;
        let mut items = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            match Self::read_record(&path).await {
                Ok(Some(item)) if item.kind() == kind => items.push(item),
                Ok(Some(item)) => {
                    warn!(path = %path.display(), found = %item.kind(), expected = %kind, "Skipping misplaced library item");
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable library item");
                }
            }
        }

        Ok(items)
    }

    async fn delete(&self, kind: ItemKind, id: &str) -> Result<(), LibraryError> {
        let path = self.record_path(kind, id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
