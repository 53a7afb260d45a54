//! Library item endpoints.
//!
//! The four item kinds share one set of generic handlers, parameterized by a
//! [`Resource`] marker type. Graphs add volatile creation on top.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_library_repository::{ItemStore, Library};
use metrics_library_shared::{
    Collection, ExpandQuery, Graph, Group, GroupType, ItemKind, ItemSummary, LibraryItem, Triplet,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{decode_body, ListParams};
use crate::auth::Authorized;
use crate::errors::ApiError;
use crate::server::state::AppState;

/// A library item collection exposed under `/library/<kind>/`.
pub trait Resource: Send + Sync + 'static {
    type Item: LibraryItem;

    const KIND: ItemKind;

    fn store(library: &Library) -> &ItemStore<Self::Item>;

    /// Adjust a decoded payload before it is written.
    fn prepare(_item: &mut Self::Item) {}
}

pub struct Graphs;
pub struct Collections;
pub struct SourceGroups;
pub struct MetricGroups;

impl Resource for Graphs {
    type Item = Graph;
    const KIND: ItemKind = ItemKind::Graph;

    fn store(library: &Library) -> &ItemStore<Graph> {
        library.graphs()
    }
}

impl Resource for Collections {
    type Item = Collection;
    const KIND: ItemKind = ItemKind::Collection;

    fn store(library: &Library) -> &ItemStore<Collection> {
        library.collections()
    }
}

impl Resource for SourceGroups {
    type Item = Group;
    const KIND: ItemKind = ItemKind::SourceGroup;

    fn store(library: &Library) -> &ItemStore<Group> {
        library.source_groups()
    }

    fn prepare(group: &mut Group) {
        group.group_type = GroupType::Source;
    }
}

impl Resource for MetricGroups {
    type Item = Group;
    const KIND: ItemKind = ItemKind::MetricGroup;

    fn store(library: &Library) -> &ItemStore<Group> {
        library.metric_groups()
    }

    fn prepare(group: &mut Group) {
        group.group_type = GroupType::Metric;
    }
}

/// Query parameters accepted on item creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateParams {
    /// ID of an existing item to copy before applying the payload.
    pub inherit: Option<String>,

    /// Graphs only: keep the graph in memory until it is read once.
    pub volatile: Option<String>,
}

impl CreateParams {
    pub fn is_volatile(&self) -> bool {
        matches!(self.volatile.as_deref(), Some("1" | "true"))
    }

    fn inherit_id(&self) -> Option<&str> {
        self.inherit.as_deref().filter(|id| !id.is_empty())
    }
}

fn created(kind: ItemKind, id: &str) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/library/{}/{}", kind, id))],
    )
        .into_response()
}

async fn create_stored<R: Resource>(
    library: &Library,
    params: &CreateParams,
    body: &[u8],
) -> Result<String, ApiError> {
    let store = R::store(library);

    match params.inherit_id() {
        Some(source_id) => {
            let patch: Value = decode_body(body)?;
            Ok(store.create_inherited(source_id, patch).await?)
        }
        None => {
            let mut item: R::Item = decode_body(body)?;
            R::prepare(&mut item);
            Ok(store.create(item).await?)
        }
    }
}

pub async fn list_items<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ItemSummary>>, ApiError> {
    let filter = params.name_filter()?;
    Ok(Json(
        R::store(&state.library)
            .list(filter.as_ref(), params.page())
            .await,
    ))
}

pub async fn create_item<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
    _: Authorized,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = create_stored::<R>(&state.library, &params, &body).await?;
    Ok(created(R::KIND, &id))
}

pub async fn get_item<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R::Item>, ApiError> {
    Ok(Json(R::store(&state.library).get(&id).await?))
}

pub async fn update_item<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _: Authorized,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let mut item: R::Item = decode_body(&body)?;
    R::prepare(&mut item);
    R::store(&state.library).update(&id, item).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_item<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _: Authorized,
) -> Result<StatusCode, ApiError> {
    R::store(&state.library).delete(&id).await?;
    Ok(StatusCode::OK)
}

/// Create a graph, durably or as a single-read volatile graph.
pub async fn create_graph(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
    _: Authorized,
    body: Bytes,
) -> Result<Response, ApiError> {
    if !params.is_volatile() {
        let id = create_stored::<Graphs>(&state.library, &params, &body).await?;
        return Ok(created(ItemKind::Graph, &id));
    }

    if params.inherit_id().is_some() {
        return Err(ApiError::bad_request(
            "volatile graphs cannot inherit from a stored graph",
        ));
    }

    let graph: Graph = decode_body(&body)?;
    let location = state.library.create_graph(graph, true).await?;
    debug!(id = %location.id(), "Created volatile graph");

    Ok(created(ItemKind::Graph, location.id()))
}

/// Fetch a graph; a volatile graph is consumed by this read.
pub async fn get_graph(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Graph>, ApiError> {
    Ok(Json(state.library.get_graph(&id).await?))
}

/// Resolve group references in `[origin, source, metric]` triplets.
pub async fn expand(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Vec<Triplet>>>, ApiError> {
    let queries: Vec<ExpandQuery> = decode_body(&body)?;
    Ok(Json(state.library.expand_triplets(&queries).await?))
}
