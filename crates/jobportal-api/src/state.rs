//! Application state.

use std::sync::Arc;

use jobportal_store::{JobStore, MongoStore, StoreError};

use crate::config::ApiConfig;
use crate::services::JobService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: JobService,
}

impl AppState {
    /// Connect to the document store and build the service layer.
    pub async fn new(config: ApiConfig) -> Result<Self, StoreError> {
        let store = MongoStore::connect_from_env().await?;
        let jobs = JobService::new(Arc::new(store.jobs()));
        Ok(Self { config, jobs })
    }

    /// Build state over an existing store implementation (used by tests).
    pub fn with_store(config: ApiConfig, store: Arc<dyn JobStore>) -> Self {
        let jobs = JobService::new(store);
        Self { config, jobs }
    }
}
