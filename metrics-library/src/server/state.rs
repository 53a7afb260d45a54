use std::path::PathBuf;
use std::sync::Arc;

use metrics_library_repository::Library;

use crate::auth::Credentials;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Library>,

    /// Required on writes when set.
    pub credentials: Option<Arc<Credentials>>,

    /// Snapshot re-read by `/reload`.
    pub catalog_path: Option<Arc<PathBuf>>,
}

impl AppState {
    pub fn new(library: Arc<Library>, credentials: Option<Credentials>) -> Self {
        Self {
            library,
            credentials: credentials.map(Arc::new),
            catalog_path: None,
        }
    }

    pub fn with_catalog_path(mut self, path: Option<PathBuf>) -> Self {
        self.catalog_path = path.map(Arc::new);
        self
    }
}
