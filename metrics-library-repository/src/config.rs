//! Configuration types for the [`Library`](crate::Library).

use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::LibraryError;
use crate::interfaces::ItemPersistence;
use crate::persistence::{FilePersistence, MockPersistence};

/// Where library items are persisted.
///
/// Use [`PersistenceSource::mock`] for tests and throwaway instances, and
/// [`PersistenceSource::filesystem`] when items must survive a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersistenceSource {
    /// Keep items in memory only.
    #[default]
    Mock,

    /// Store one JSON file per item under a data directory.
    Filesystem {
        /// Root of the data directory, created if missing
        path: PathBuf,
    },
}

impl PersistenceSource {
    pub fn mock() -> Self {
        Self::Mock
    }

    pub fn filesystem(path: impl Into<PathBuf>) -> Self {
        Self::Filesystem { path: path.into() }
    }

    /// Build the backend this source describes.
    pub async fn into_persistence(self) -> Result<Arc<dyn ItemPersistence>, LibraryError> {
        match self {
            Self::Mock => Ok(Arc::new(MockPersistence::new())),
            Self::Filesystem { path } => Ok(Arc::new(FilePersistence::new(path).await?)),
        }
    }
}

/// Configuration for the Library service.
#[derive(Debug, Clone, Default)]
pub struct LibraryConfig {
    pub persistence: PersistenceSource,
}

impl LibraryConfig {
    /// An in-memory library.
    pub fn mock() -> Self {
        Self {
            persistence: PersistenceSource::mock(),
        }
    }

    /// A library persisted under `path`.
    pub fn filesystem(path: impl Into<PathBuf>) -> Self {
        Self {
            persistence: PersistenceSource::filesystem(path),
        }
    }
}
