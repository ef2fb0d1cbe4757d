use super::{CacheConnector, ConnectorError};
use crate::configuration::RedisSettings;
use crate::health::{reconnect_backoff, retry_with_backoff, ProbeFailure, ProbeResult};
use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, RedisResult};
use std::future::Future;
use tokio::time::timeout;

/// Written and read back on every probe.
const SENTINEL_KEY: &str = "healthboard:probe";
const VIEW_COUNTER_KEY: &str = "page_views";
const LAST_ACCESS_TTL_SECONDS: u64 = 300;

pub struct RedisConnector {
    settings: RedisSettings,
}

impl RedisConnector {
    pub fn new(settings: RedisSettings) -> Self {
        Self { settings }
    }

    fn last_access_key(caller: &str) -> String {
        format!("last_access:{}", caller)
    }

    /// Opens a connection, retrying with a capped linear backoff.
    async fn connect(&self) -> Result<MultiplexedConnection, ConnectorError> {
        let client = redis::Client::open(self.settings.connection_info())
            .map_err(ConnectorError::from_redis)?;
        let limit = self.settings.connect_timeout();

        retry_with_backoff(self.settings.max_retries, reconnect_backoff, |_retry| {
            let client = client.clone();
            async move {
                match timeout(limit, client.get_multiplexed_async_connection()).await {
                    Ok(Ok(conn)) => Ok(conn),
                    Ok(Err(err)) => Err(ConnectorError::from_redis(err)),
                    Err(_) => Err(ConnectorError::Timeout(limit)),
                }
            }
        })
        .await
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, ConnectorError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        let limit = self.settings.connect_timeout();
        timeout(limit, fut)
            .await
            .map_err(|_| ConnectorError::Timeout(limit))?
            .map_err(ConnectorError::from_redis)
    }

    async fn round_trip(
        &self,
        conn: &mut MultiplexedConnection,
        written: &str,
    ) -> Result<String, ConnectorError> {
        let _: () = self.bounded(conn.set(SENTINEL_KEY, written)).await?;
        let value: Option<String> = self.bounded(conn.get(SENTINEL_KEY)).await?;

        verify_sentinel(written, value)
    }

    async fn count_view(
        &self,
        conn: &mut MultiplexedConnection,
        caller: &str,
    ) -> Result<i64, ConnectorError> {
        let views: i64 = self.bounded(conn.incr(VIEW_COUNTER_KEY, 1)).await?;

        let _: () = self
            .bounded(
                redis::cmd("SET")
                    .arg(Self::last_access_key(caller))
                    .arg(Utc::now().to_rfc3339())
                    .arg("EX")
                    .arg(LAST_ACCESS_TTL_SECONDS)
                    .query_async(conn),
            )
            .await?;

        Ok(views)
    }
}

fn verify_sentinel(written: &str, read: Option<String>) -> Result<String, ConnectorError> {
    match read {
        Some(value) if value == written => Ok(value),
        other => Err(ConnectorError::Query {
            code: None,
            message: format!(
                "Sentinel mismatch: wrote {:?}, read back {:?}",
                written, other
            ),
        }),
    }
}

#[async_trait]
impl CacheConnector for RedisConnector {
    #[tracing::instrument(name = "Probe cache", skip(self))]
    async fn probe(&self) -> ProbeResult {
        let mut conn = match self.connect().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!("Redis connection failed: {}", err);
                return ProbeResult::Disconnected(err.into());
            }
        };

        let written = Utc::now().to_rfc3339();
        let outcome = self.round_trip(&mut conn, &written).await;
        // dropping the last handle shuts the multiplexed connection down
        drop(conn);

        match outcome {
            Ok(value) => ProbeResult::Connected(format!("Test Value: {}", value)),
            Err(err) => {
                tracing::warn!("Redis round trip failed: {}", err);
                ProbeResult::Disconnected(ProbeFailure::from(err))
            }
        }
    }

    #[tracing::instrument(name = "Increment view counter", skip(self))]
    async fn increment_views(&self, caller: &str) -> Result<i64, ConnectorError> {
        let mut conn = self.connect().await?;
        let outcome = self.count_view(&mut conn, caller).await;
        drop(conn);
        outcome
    }
}
