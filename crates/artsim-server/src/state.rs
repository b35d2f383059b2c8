//! Application state shared across all handlers.

use artsim_cluster::ArticleService;
use artsim_core::config::ArtsimConfig;
use artsim_core::error::Result;
use artsim_similarity::DuplicateDetector;
use artsim_storage::open_storage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ArticleService>,
    /// Deadline applied to every request.
    pub request_timeout: Duration,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: ArticleService, request_timeout: Duration) -> Self {
        Self { service: Arc::new(service), request_timeout, start_time: Instant::now() }
    }

    /// Validate `config`, load the verb table and open the storage backend.
    pub async fn from_config(config: &ArtsimConfig) -> Result<Self> {
        config.validate()?;
        let detector = DuplicateDetector::from_config(&config.similarity)?;
        let storage = open_storage(&config.storage).await?;
        info!(
            backend = %config.storage.backend,
            threshold = config.similarity.threshold,
            scan_limit = config.storage.scan_limit,
            "initialized article service"
        );
        let service = ArticleService::new(storage, Arc::new(detector));
        Ok(Self::new(service, config.server.request_timeout()))
    }
}
