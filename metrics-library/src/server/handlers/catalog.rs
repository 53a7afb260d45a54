//! Read-only catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use metrics_library_shared::{MetricInfo, SourceInfo};

use super::ListParams;
use crate::errors::ApiError;
use crate::server::state::AppState;

pub async fn list_origins(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let filter = params.name_filter()?;
    Ok(Json(
        state
            .library
            .catalog()
            .list_origins(filter.as_ref(), params.page()),
    ))
}

pub async fn list_sources(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let filter = params.name_filter()?;
    Ok(Json(
        state
            .library
            .catalog()
            .list_sources(filter.as_ref(), params.page()),
    ))
}

pub async fn get_source(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SourceInfo>, ApiError> {
    Ok(Json(state.library.catalog().get_source(&name)?))
}

pub async fn list_metrics(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let filter = params.name_filter()?;
    let source = params.source.as_deref().filter(|source| !source.is_empty());
    Ok(Json(state.library.catalog().list_metrics(
        source,
        filter.as_ref(),
        params.page(),
    )))
}

/// The name is the rest of the path, so `database2/test` and `database2%2Ftest` both resolve.
pub async fn get_metric(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MetricInfo>, ApiError> {
    Ok(Json(state.library.catalog().get_metric(&name)?))
}
