use std::sync::Arc;

use timetrack_core::cache::MemoryCache;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: timetrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Read-through cache for users and projects.
    pub cache: Arc<MemoryCache>,
}

impl AppState {
    pub fn new(pool: timetrack_db::DbPool, config: ServerConfig) -> Self {
        let cache = Arc::new(MemoryCache::new(config.cache.max_entries));
        Self {
            pool,
            config: Arc::new(config),
            cache,
        }
    }
}
