//! Catalog lookup responses.

use serde::{Deserialize, Serialize};

/// Which origins carry a given source name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceInfo {
    pub name: String,
    pub origins: Vec<String>,
}

/// Which sources and origins carry a given metric name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricInfo {
    pub name: String,
    pub sources: Vec<String>,
    pub origins: Vec<String>,
}
