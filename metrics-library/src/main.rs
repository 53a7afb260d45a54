//! Metrics Library Main Entry Point
//!
//! Serves the catalog and the graph library over HTTP.

use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use metrics_library::catalog_loader::{load_catalog, spawn_refresh};
use metrics_library::server::{self, state::AppState};
use metrics_library::{ServerConfig, ServiceError};
use metrics_library_repository::Library;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Initialize tracing/logging. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("metrics_library=info,metrics_library_repository=info,tower_http=info")
    });

    let format = env::var("LOG_FORMAT").unwrap_or_default();
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if format.eq_ignore_ascii_case("json") {
        fmt_layer.json().with_thread_ids(true).boxed()
    } else {
        fmt_layer.pretty().boxed()
    };

    tracing_subscriber::registry().with(fmt_layer).with(filter).init();

    let log_format = if format.is_empty() { "pretty" } else { format.as_str() };
    info!(
        service_name = "metrics-library",
        service_version = env!("CARGO_PKG_VERSION"),
        log_format,
        "Tracing initialized"
    );
}

async fn build_library(config: &ServerConfig) -> Result<Arc<Library>, ServiceError> {
    let library = Arc::new(Library::open(config.library_config()).await?);

    match &config.catalog_path {
        Some(path) => {
            library.refresh_catalog(load_catalog(path).await?);
            if let Some(period) = config.catalog_refresh {
                spawn_refresh(library.clone(), path.clone(), period);
            }
        }
        None => warn!("CATALOG_PATH not set, serving an empty catalog"),
    }

    Ok(library)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting metrics library server...");

    let config = ServerConfig::from_env()?;
    info!(
        addr = %config.addr(),
        data_dir = ?config.data_dir,
        catalog_path = ?config.catalog_path,
        auth = config.credentials.is_some(),
        "Configuration loaded"
    );

    let library = match build_library(&config).await {
        Ok(library) => library,
        Err(e) => {
            error!(error = %e, "Failed to initialize library");
            return Err(e.into());
        }
    };

    let state = AppState::new(library, config.credentials.clone())
        .with_catalog_path(config.catalog_path.clone());
    let app = server::create_app(state);
    server::run_server(app, config.addr()).await
}
