use std::sync::Arc;

use crate::config::Config;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record store. `PgStore` in production, `MemoryStore` for local runs and tests.
    pub store: Arc<dyn Store>,
    pub config: Config,
}

impl AppState {
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(crate::store::MemoryStore::new()),
            config: Config::in_memory(),
        }
    }
}
