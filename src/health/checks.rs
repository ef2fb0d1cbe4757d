use super::models::{ProbeFailure, ProbeResult, ProcessInfo, StatusSnapshot};
use crate::connectors::{CacheConnector, DatabaseConnector};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Hard ceiling per probe, on top of the probes' own connect timeouts.
const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HealthChecker {
    database: Arc<dyn DatabaseConnector>,
    cache: Arc<dyn CacheConnector>,
    port: u16,
    started_at: DateTime<Utc>,
    start_time: Instant,
}

impl HealthChecker {
    pub fn new(
        database: Arc<dyn DatabaseConnector>,
        cache: Arc<dyn CacheConnector>,
        port: u16,
    ) -> Self {
        Self {
            database,
            cache,
            port,
            started_at: Utc::now(),
            start_time: Instant::now(),
        }
    }

    fn process_info(&self) -> ProcessInfo {
        ProcessInfo {
            port: self.port,
            pid: std::process::id(),
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Probes both dependencies concurrently and merges the results.
    #[tracing::instrument(name = "Take status snapshot", skip(self))]
    pub async fn snapshot(&self) -> StatusSnapshot {
        let db_check = timeout(CHECK_TIMEOUT, self.database.probe());
        let cache_check = timeout(CHECK_TIMEOUT, self.cache.probe());

        let (db_result, cache_result) = tokio::join!(db_check, cache_check);

        let database = db_result.unwrap_or_else(|_| {
            ProbeResult::Disconnected(ProbeFailure::timeout("Database probe timed out"))
        });
        let cache = cache_result.unwrap_or_else(|_| {
            ProbeResult::Disconnected(ProbeFailure::timeout("Cache probe timed out"))
        });

        tracing::info!(
            database = database.is_connected(),
            cache = cache.is_connected(),
            "Status snapshot taken"
        );

        StatusSnapshot {
            database,
            cache,
            process: self.process_info(),
            checked_at: Utc::now(),
        }
    }
}
