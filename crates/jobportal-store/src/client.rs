//! MongoDB connection handling.

use bson::doc;
use mongodb::{Client, Database};
use tracing::info;

use crate::error::StoreResult;
use crate::jobs::JobRepository;

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection string
    pub uri: String,
    /// Database name
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "jobportal".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: std::env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "jobportal".to_string()),
        }
    }
}

/// Handle to the job portal database.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to MongoDB.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);
        info!(database = %config.database, "Connected to MongoDB");
        Ok(Self { db })
    }

    /// Connect using `MONGODB_URI` / `MONGODB_DATABASE`.
    pub async fn connect_from_env() -> StoreResult<Self> {
        Self::connect(&StoreConfig::from_env()).await
    }

    /// Round-trip ping, for readiness probes.
    pub async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Repository over the `jobs` collection.
    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(self.db.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "jobportal");
    }
}
