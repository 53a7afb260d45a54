//! Single-read storage for preview graphs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use metrics_library_shared::Graph;
use tracing::debug;
use uuid::Uuid;

use crate::errors::LibraryError;

/// Graphs stored without persistence and released on first read.
///
/// Unread entries are kept until consumed or until the process exits.
#[derive(Default)]
pub struct VolatileCache {
    entries: Mutex<HashMap<String, Graph>>,
}

impl VolatileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `graph` under a fresh ID and return that ID.
    pub fn put(&self, mut graph: Graph) -> String {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };

        graph.meta.id = id.clone();
        graph.meta.touch();
        entries.insert(id.clone(), graph);

        debug!(id = %id, "Stored volatile graph");
        id
    }

    /// Remove and return the graph stored under `id`.
    ///
    /// Exactly one caller ever receives a given entry; every other call,
    /// concurrent or later, gets `NotFound`.
    pub fn take_once(&self, id: &str) -> Result<Graph, LibraryError> {
        let graph = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .ok_or_else(|| LibraryError::not_found(format!("volatile graph {}", id)))?;

        debug!(id = %id, "Consumed volatile graph");
        Ok(graph)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
