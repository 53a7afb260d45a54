//! HTTP request handlers.

pub mod catalog;
pub mod library;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_library_repository::{LibraryError, NameFilter};
use metrics_library_shared::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::auth::Authorized;
use crate::catalog_loader::load_catalog;
use crate::errors::ApiError;
use crate::server::state::AppState;

/// Query parameters accepted by every listing endpoint.
///
/// A `limit` of zero, like an absent one, means no limit.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub filter: Option<String>,

    /// Metric listings only: restrict to metrics of this source.
    pub source: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> Page {
        Page::new(
            self.offset.unwrap_or(0),
            self.limit.filter(|limit| *limit > 0),
        )
    }

    pub fn name_filter(&self) -> Result<Option<NameFilter>, LibraryError> {
        match self.filter.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => NameFilter::parse(raw).map(Some),
        }
    }
}

/// Decode a JSON request body.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Metrics library is running")
}

/// Re-read the catalog snapshot and every stored item.
///
/// A snapshot that fails to load leaves both the catalog and the library untouched.
pub async fn reload(State(state): State<AppState>, _: Authorized) -> Result<StatusCode, ApiError> {
    if let Some(path) = state.catalog_path.as_deref() {
        let catalog = load_catalog(path)
            .await
            .map_err(|e| ApiError::ReloadFailed(e.to_string()))?;
        state.library.refresh_catalog(catalog);
    }

    state.library.load().await?;
    info!("Catalog and library reloaded");
    Ok(StatusCode::OK)
}

/// Fallback for verbs a resource does not support.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::Library(LibraryError::not_found("resource"))
}
