use crate::health::ProbeFailure;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the database or the cache.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Host unreachable, TLS failure or credentials rejected
    #[error("Connection failed: {message}")]
    Connection {
        code: Option<String>,
        message: String,
    },
    /// Connected, but the statement or command failed
    #[error("Query failed: {message}")]
    Query {
        code: Option<String>,
        message: String,
    },
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl ConnectorError {
    pub fn connection_from_sqlx(err: sqlx::Error) -> Self {
        Self::Connection {
            code: sqlx_code(&err),
            message: err.to_string(),
        }
    }

    pub fn query_from_sqlx(err: sqlx::Error) -> Self {
        Self::Query {
            code: sqlx_code(&err),
            message: err.to_string(),
        }
    }

    /// Redis errors are split by the error itself: I/O and refusal are
    /// connection failures, everything else came back from the server.
    pub fn from_redis(err: redis::RedisError) -> Self {
        let code = err
            .code()
            .map(str::to_string)
            .or_else(|| Some(format!("{:?}", err.kind())));
        let message = err.to_string();

        if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
            Self::Connection { code, message }
        } else if err.is_timeout() {
            Self::Connection {
                code: Some("ETIMEDOUT".to_string()),
                message,
            }
        } else {
            Self::Query { code, message }
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Connection { code, .. } | Self::Query { code, .. } => code.as_deref(),
            Self::Timeout(_) => Some("ETIMEDOUT"),
        }
    }
}

fn sqlx_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        sqlx::Error::Io(io) => Some(format!("{:?}", io.kind())),
        sqlx::Error::Tls(_) => Some("TLS".to_string()),
        sqlx::Error::PoolTimedOut => Some("ETIMEDOUT".to_string()),
        _ => None,
    }
}

impl From<ConnectorError> for ProbeFailure {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::Connection { code, message } => ProbeFailure::connection(code, message),
            ConnectorError::Query { code, message } => ProbeFailure::query(code, message),
            ConnectorError::Timeout(after) => {
                ProbeFailure::timeout(format!("No response within {:?}", after))
            }
        }
    }
}

impl ResponseError for ConnectorError {
    fn error_response(&self) -> HttpResponse {
        let summary = match self {
            Self::Connection { .. } => "Connection failed",
            Self::Query { .. } => "Query failed",
            Self::Timeout(_) => "Timed out",
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": summary,
            "code": self.code(),
            "details": self.to_string(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
