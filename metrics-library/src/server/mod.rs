// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use self::handlers::library::{self as library, Collections, Graphs, MetricGroups, Resource, SourceGroups};
use self::handlers::{catalog, health_check, method_not_allowed, not_found, reload};
use self::state::AppState;
use crate::config::create_cors_layer;

/// Register `path` both with and without a trailing slash.
fn route_collection(router: Router<AppState>, path: &str, methods: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, methods.clone())
        .route(&format!("{}/", path), methods)
}

fn item_routes<R: Resource>(
    router: Router<AppState>,
    collection: MethodRouter<AppState>,
    item: MethodRouter<AppState>,
) -> Router<AppState> {
    let path = format!("/library/{}", R::KIND);
    route_collection(router, &path, collection.fallback(method_not_allowed))
        .route(&format!("{}/:id", path), item.fallback(method_not_allowed))
}

fn catalog_routes(router: Router<AppState>) -> Router<AppState> {
    let router = route_collection(
        router,
        "/catalog/origins",
        get(catalog::list_origins).fallback(method_not_allowed),
    );
    let router = route_collection(
        router,
        "/catalog/sources",
        get(catalog::list_sources).fallback(method_not_allowed),
    );
    let router = route_collection(
        router,
        "/catalog/metrics",
        get(catalog::list_metrics).fallback(method_not_allowed),
    );

    router
        .route(
            "/catalog/sources/:name",
            get(catalog::get_source).fallback(method_not_allowed),
        )
        .route(
            "/catalog/metrics/*name",
            get(catalog::get_metric).fallback(method_not_allowed),
        )
}

fn library_routes(router: Router<AppState>) -> Router<AppState> {
    let router = item_routes::<Graphs>(
        router,
        get(library::list_items::<Graphs>).post(library::create_graph),
        get(library::get_graph)
            .put(library::update_item::<Graphs>)
            .delete(library::delete_item::<Graphs>),
    );
    let router = item_routes::<Collections>(
        router,
        get(library::list_items::<Collections>).post(library::create_item::<Collections>),
        get(library::get_item::<Collections>)
            .put(library::update_item::<Collections>)
            .delete(library::delete_item::<Collections>),
    );
    let router = item_routes::<SourceGroups>(
        router,
        get(library::list_items::<SourceGroups>).post(library::create_item::<SourceGroups>),
        get(library::get_item::<SourceGroups>)
            .put(library::update_item::<SourceGroups>)
            .delete(library::delete_item::<SourceGroups>),
    );
    let router = item_routes::<MetricGroups>(
        router,
        get(library::list_items::<MetricGroups>).post(library::create_item::<MetricGroups>),
        get(library::get_item::<MetricGroups>)
            .put(library::update_item::<MetricGroups>)
            .delete(library::delete_item::<MetricGroups>),
    );

    router.route(
        "/library/expand",
        post(library::expand).fallback(method_not_allowed),
    )
}

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/reload", get(reload).fallback(method_not_allowed));
    let router = catalog_routes(router);
    let router = library_routes(router);

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C.
pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Server listening on {}", addr);
    info!("- Catalog endpoint: http://{}/catalog/", addr);
    info!("- Library endpoint: http://{}/library/", addr);
    info!("- Health endpoint: http://{}/health", addr);
    info!("- Reload endpoint: http://{}/reload", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
