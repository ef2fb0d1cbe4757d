use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Host unreachable, auth rejected, timeout.
    Connection,
    /// Connected, but a statement or command failed.
    Query,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProbeFailure {
    pub kind: FailureKind,
    pub code: Option<String>,
    pub message: String,
}

impl ProbeFailure {
    pub fn connection(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Connection,
            code,
            message: message.into(),
        }
    }

    pub fn query(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Query,
            code,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::connection(Some("ETIMEDOUT".to_string()), message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Connected(String),
    Disconnected(ProbeFailure),
}

impl ProbeResult {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    pub fn failure(&self) -> Option<&ProbeFailure> {
        match self {
            Self::Connected(_) => None,
            Self::Disconnected(failure) => Some(failure),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProcessInfo {
    pub port: u16,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
}

/// Probe results of one check, plus process metadata. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub database: ProbeResult,
    pub cache: ProbeResult,
    pub process: ProcessInfo,
    pub checked_at: DateTime<Utc>,
}

impl StatusSnapshot {
    pub fn status(&self) -> OverallStatus {
        if self.all_connected() {
            OverallStatus::Healthy
        } else {
            OverallStatus::Degraded
        }
    }

    pub fn all_connected(&self) -> bool {
        self.database.is_connected() && self.cache.is_connected()
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.checked_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(database: ProbeResult, cache: ProbeResult) -> StatusSnapshot {
        StatusSnapshot {
            database,
            cache,
            process: ProcessInfo {
                port: 3000,
                pid: 1,
                started_at: Utc::now(),
                uptime_seconds: 0,
            },
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn both_connected_is_healthy() {
        let s = snapshot(
            ProbeResult::Connected("Database: mysql".to_string()),
            ProbeResult::Connected("Test Value: x".to_string()),
        );
        assert_eq!(s.status(), OverallStatus::Healthy);
    }

    #[test]
    fn any_disconnected_is_degraded() {
        let s = snapshot(
            ProbeResult::Disconnected(ProbeFailure::connection(
                Some("ConnectionRefused".to_string()),
                "refused",
            )),
            ProbeResult::Connected("Test Value: x".to_string()),
        );
        assert_eq!(s.status(), OverallStatus::Degraded);
        assert!(!s.all_connected());
    }

    #[test]
    fn timeout_is_a_connection_failure() {
        let failure = ProbeFailure::timeout("no answer");
        assert_eq!(failure.kind, FailureKind::Connection);
        assert_eq!(failure.code.as_deref(), Some("ETIMEDOUT"));
    }

    #[test]
    fn failure_kind_serializes_lowercase() {
        let failure = ProbeFailure::query(Some("42S02".to_string()), "missing table");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "query");
        assert_eq!(json["code"], "42S02");
    }
}
