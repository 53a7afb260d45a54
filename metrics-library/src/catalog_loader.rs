//! Catalog snapshot loading.
//!
//! The catalog is read from a JSON document of the form
//! `{"origin": {"source": ["metric", ...]}}` and optionally reloaded on a
//! fixed interval.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use metrics_library_repository::{Catalog, Library};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::ServiceError;

/// Read and decode a catalog snapshot.
pub async fn load_catalog(path: &Path) -> Result<Catalog, ServiceError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| ServiceError::catalog(format!("{}: {}", path.display(), e)))?;

    serde_json::from_slice(&data)
        .map_err(|e| ServiceError::catalog(format!("{}: {}", path.display(), e)))
}

/// Reload the snapshot every `period`.
///
/// A failed reload keeps the current catalog in place.
pub fn spawn_refresh(library: Arc<Library>, path: PathBuf, period: Duration) -> JoinHandle<()> {
    info!(path = %path.display(), period_secs = period.as_secs(), "Scheduling catalog refresh");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately and the snapshot was just loaded.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match load_catalog(&path).await {
                Ok(catalog) => library.refresh_catalog(catalog),
                Err(e) => warn!(error = %e, "Catalog refresh failed, keeping previous snapshot"),
            }
        }
    })
}
