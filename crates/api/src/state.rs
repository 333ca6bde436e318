use std::sync::Arc;

use datalab_core::ingest::Ingestor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: datalab_db::DbPool,
    /// Server configuration (upload limits are read by the upload handler).
    pub config: Arc<ServerConfig>,
    /// Upload batch runner, staging into `config.upload_dir`.
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    pub fn new(pool: datalab_db::DbPool, config: ServerConfig) -> Self {
        let ingestor = Ingestor::new(config.upload_dir.clone());
        Self {
            pool,
            config: Arc::new(config),
            ingestor: Arc::new(ingestor),
        }
    }
}
