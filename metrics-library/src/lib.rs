//! # Metrics Library
//!
//! HTTP front end for the metrics library: read-only catalog browsing,
//! CRUD over graphs, collections and groups, volatile graphs and bulk group
//! expansion. The engine itself lives in `metrics-library-repository`.

pub mod auth;
pub mod catalog_loader;
pub mod config;
pub mod errors;
pub mod server;

pub use config::ServerConfig;
pub use errors::{ApiError, ServiceError};
