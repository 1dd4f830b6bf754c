//! Shared application state for all routes.

use crate::highlight::Highlighter;
use crate::store::{MemoryStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Syntax and theme sets are loaded once and shared read-only.
    pub highlighter: Arc<Highlighter>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        AppState {
            store,
            highlighter: Arc::new(Highlighter::new()),
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
