//! Server configuration loaded from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use metrics_library_repository::LibraryConfig;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::auth::Credentials;
use crate::errors::ServiceError;

/// Default listen address.
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default listen port.
const DEFAULT_PORT: u16 = 12003;

/// Origins allowed to call the API from a browser during local development.
const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,

    /// Item data directory; items are kept in memory when unset.
    pub data_dir: Option<PathBuf>,

    /// JSON catalog snapshot to serve.
    pub catalog_path: Option<PathBuf>,

    /// How often the catalog snapshot is reloaded, if at all.
    pub catalog_refresh: Option<Duration>,

    pub credentials: Option<Credentials>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            data_dir: None,
            catalog_path: None,
            catalog_refresh: None,
            credentials: None,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LIBRARY_HOST`: Listen address (default: 127.0.0.1)
    /// - `LIBRARY_PORT`: Listen port (default: 12003)
    /// - `LIBRARY_DATA_DIR`: Item data directory (default: in-memory storage)
    /// - `CATALOG_PATH`: JSON catalog snapshot (default: empty catalog)
    /// - `CATALOG_REFRESH_SECS`: Snapshot reload interval (default: never)
    /// - `AUTH_USERNAME` / `AUTH_PASSWORD`: Credentials required on writes (default: none)
    pub fn from_env() -> Result<Self, ServiceError> {
        let host = match env::var("LIBRARY_HOST") {
            Ok(value) => value
                .parse::<IpAddr>()
                .map_err(|e| ServiceError::config(format!("Invalid LIBRARY_HOST {:?}: {}", value, e)))?,
            Err(_) => DEFAULT_HOST,
        };

        let port = match env::var("LIBRARY_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| ServiceError::config(format!("Invalid LIBRARY_PORT {:?}: {}", value, e)))?,
            Err(_) => DEFAULT_PORT,
        };

        let catalog_refresh = match env::var("CATALOG_REFRESH_SECS") {
            Ok(value) => match value.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(e) => {
                    return Err(ServiceError::config(format!(
                        "Invalid CATALOG_REFRESH_SECS {:?}: {}",
                        value, e
                    )))
                }
            },
            Err(_) => None,
        };

        let credentials = match (env::var("AUTH_USERNAME").ok(), env::var("AUTH_PASSWORD").ok()) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            (None, None) => None,
            _ => {
                return Err(ServiceError::config(
                    "AUTH_USERNAME and AUTH_PASSWORD must be set together",
                ))
            }
        };

        if credentials.is_none() {
            warn!("No credentials configured, write requests are not authenticated");
        }

        Ok(Self {
            host,
            port,
            data_dir: env::var("LIBRARY_DATA_DIR").ok().map(PathBuf::from),
            catalog_path: env::var("CATALOG_PATH").ok().map(PathBuf::from),
            catalog_refresh,
            credentials,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Persistence settings for the library.
    pub fn library_config(&self) -> LibraryConfig {
        match &self.data_dir {
            Some(path) => LibraryConfig::filesystem(path),
            None => LibraryConfig::mock(),
        }
    }
}

/// Create CORS layer for localhost development
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(DEV_ORIGINS.map(HeaderValue::from_static))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::LOCATION])
}
