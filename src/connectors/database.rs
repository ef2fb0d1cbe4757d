use super::{ConnectorError, DatabaseConnector};
use crate::configuration::DatabaseSettings;
use crate::db;
use crate::health::ProbeResult;
use crate::models::{VisitReceipt, Visitor};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use sqlx::{Connection, MySqlConnection};
use std::future::Future;
use tokio::time::timeout;

pub struct MySqlConnector {
    settings: DatabaseSettings,
}

impl MySqlConnector {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        let ssl_mode = if self.settings.require_tls {
            MySqlSslMode::Required
        } else {
            MySqlSslMode::Preferred
        };

        MySqlConnectOptions::new()
            .host(&self.settings.host)
            .port(self.settings.port)
            .username(&self.settings.username)
            .password(&self.settings.password)
            .database(&self.settings.database_name)
            .ssl_mode(ssl_mode)
    }

    async fn connect(&self) -> Result<MySqlConnection, ConnectorError> {
        let limit = self.settings.connect_timeout();
        match timeout(limit, MySqlConnection::connect_with(&self.connect_options())).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(err)) => Err(ConnectorError::connection_from_sqlx(err)),
            Err(_) => Err(ConnectorError::Timeout(limit)),
        }
    }

    async fn close(&self, conn: MySqlConnection) {
        if let Err(err) = conn.close().await {
            tracing::debug!("Failed to close MySQL connection cleanly: {:?}", err);
        }
    }

    /// Bounds a statement by the connect timeout.
    async fn bounded<T, F>(&self, fut: F) -> Result<T, ConnectorError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let limit = self.settings.connect_timeout();
        timeout(limit, fut)
            .await
            .map_err(|_| ConnectorError::Timeout(limit))?
            .map_err(ConnectorError::query_from_sqlx)
    }

    async fn liveness(&self, conn: &mut MySqlConnection) -> Result<String, ConnectorError> {
        let database = self.bounded(db::visitor::current_database(conn)).await?;

        if self.settings.ensure_schema {
            self.bounded(db::visitor::ensure_schema(conn)).await?;
        }

        Ok(match database {
            Some(name) => format!("Database: {}", name),
            None => "No database selected".to_string(),
        })
    }

    async fn write_visit(
        &self,
        conn: &mut MySqlConnection,
        ip_address: &str,
    ) -> Result<VisitReceipt, ConnectorError> {
        self.bounded(db::visitor::ensure_schema(conn)).await?;
        let insert_id = self.bounded(db::visitor::insert(conn, ip_address)).await?;
        let total_visits = self.bounded(db::visitor::count(conn)).await?;

        Ok(VisitReceipt {
            insert_id,
            total_visits,
        })
    }

    async fn read_recent(
        &self,
        conn: &mut MySqlConnection,
        limit: u32,
    ) -> Result<Vec<Visitor>, ConnectorError> {
        self.bounded(db::visitor::ensure_schema(conn)).await?;
        self.bounded(db::visitor::fetch_recent(conn, limit)).await
    }
}

#[async_trait]
impl DatabaseConnector for MySqlConnector {
    #[tracing::instrument(name = "Probe database", skip(self))]
    async fn probe(&self) -> ProbeResult {
        let mut conn = match self.connect().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::error!("Database connection failed: {}", err);
                return ProbeResult::Disconnected(err.into());
            }
        };

        let outcome = self.liveness(&mut conn).await;
        self.close(conn).await;

        match outcome {
            Ok(detail) => ProbeResult::Connected(detail),
            Err(err) => {
                tracing::error!("Database probe query failed: {}", err);
                ProbeResult::Disconnected(err.into())
            }
        }
    }

    #[tracing::instrument(name = "Record visit", skip(self))]
    async fn record_visit(&self, ip_address: &str) -> Result<VisitReceipt, ConnectorError> {
        let mut conn = self.connect().await?;
        let outcome = self.write_visit(&mut conn, ip_address).await;
        self.close(conn).await;
        outcome
    }

    #[tracing::instrument(name = "Recent visitors", skip(self))]
    async fn recent_visitors(&self, limit: u32) -> Result<Vec<Visitor>, ConnectorError> {
        let mut conn = self.connect().await?;
        let outcome = self.read_recent(&mut conn, limit).await;
        self.close(conn).await;
        outcome
    }
}
