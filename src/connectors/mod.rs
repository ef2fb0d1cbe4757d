//! Connectors for the two backing services.
//!
//! Every operation opens its own connection and closes it before returning.
//! Routes and the health checker only see the traits, so tests swap in the
//! mocks from `mock.rs`.

pub mod cache;
pub mod database;
pub mod errors;
#[cfg(test)]
pub mod mock;

pub use cache::RedisConnector;
pub use database::MySqlConnector;
pub use errors::ConnectorError;

use crate::configuration::Settings;
use crate::health::ProbeResult;
use crate::models::{VisitReceipt, Visitor};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Connect, run a trivial read, disconnect. Never fails, only reports.
    async fn probe(&self) -> ProbeResult;

    /// Insert one visitor row and return its id with the new row count.
    async fn record_visit(&self, ip_address: &str) -> Result<VisitReceipt, ConnectorError>;

    /// At most `limit` visitors, newest first.
    async fn recent_visitors(&self, limit: u32) -> Result<Vec<Visitor>, ConnectorError>;
}

#[async_trait]
pub trait CacheConnector: Send + Sync {
    /// Connect (with backoff), write and read back a sentinel key, disconnect.
    async fn probe(&self) -> ProbeResult;

    /// Increment the shared view counter and stamp the caller's last access.
    async fn increment_views(&self, caller: &str) -> Result<i64, ConnectorError>;
}

pub fn init_database(settings: &Settings) -> Arc<dyn DatabaseConnector> {
    tracing::info!(
        host = %settings.database.host,
        port = settings.database.port,
        database = %settings.database.database_name,
        "Initializing MySQL connector"
    );
    if settings.database.is_system_schema() {
        tracing::warn!(
            database = %settings.database.database_name,
            "MYSQL_DATABASE is a system schema; /test-mysql and /visitors will create `visitors` there"
        );
    }
    Arc::new(MySqlConnector::new(settings.database.clone()))
}

pub fn init_cache(settings: &Settings) -> Arc<dyn CacheConnector> {
    tracing::info!(
        host = %settings.redis.host,
        port = settings.redis.port,
        tls = settings.redis.tls,
        "Initializing Redis connector"
    );
    Arc::new(RedisConnector::new(settings.redis.clone()))
}
