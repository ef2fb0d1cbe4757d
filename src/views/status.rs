use crate::configuration::Settings;
use crate::health::{OverallStatus, ProbeFailure, ProbeResult, StatusSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Human-readable line for one probe result.
pub fn probe_message(result: &ProbeResult) -> String {
    match result {
        ProbeResult::Connected(detail) => format!("✅ CONNECTED ({})", detail),
        ProbeResult::Disconnected(failure) => match &failure.code {
            Some(code) => format!("❌ ERROR [{}]: {}", code, failure.message),
            None => format!("❌ ERROR: {}", failure.message),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus<C> {
    pub connected: bool,
    pub message: String,
    pub error: Option<ProbeFailure>,
    pub config: C,
}

impl<C> ServiceStatus<C> {
    fn new(result: &ProbeResult, config: C) -> Self {
        Self {
            connected: result.is_connected(),
            message: probe_message(result),
            error: result.failure().cloned(),
            config,
        }
    }
}

// credentials are never echoed
#[derive(Debug, Serialize)]
pub struct DatabaseEcho {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

#[derive(Debug, Serialize)]
pub struct CacheEcho {
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub status: &'static str,
    pub port: u16,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct Services {
    pub server: ServerStatus,
    pub mysql: ServiceStatus<DatabaseEcho>,
    pub redis: ServiceStatus<CacheEcho>,
}

/// Body of `/status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub app: String,
    pub message: &'static str,
    pub status: OverallStatus,
    pub timestamp: DateTime<Utc>,
    pub services: Services,
}

impl StatusReport {
    pub fn new(settings: &Settings, snapshot: &StatusSnapshot) -> Self {
        Self {
            app: settings.app_name.clone(),
            message: "It works!",
            status: snapshot.status(),
            timestamp: snapshot.checked_at,
            services: Services {
                server: ServerStatus {
                    status: "running",
                    port: snapshot.process.port,
                    pid: snapshot.process.pid,
                    started_at: snapshot.process.started_at,
                    uptime_seconds: snapshot.process.uptime_seconds,
                },
                mysql: ServiceStatus::new(
                    &snapshot.database,
                    DatabaseEcho {
                        host: settings.database.host.clone(),
                        port: settings.database.port,
                        user: settings.database.username.clone(),
                        database: settings.database.database_name.clone(),
                    },
                ),
                redis: ServiceStatus::new(
                    &snapshot.cache,
                    CacheEcho {
                        host: settings.redis.host.clone(),
                        port: settings.redis.port,
                        tls: settings.redis.tls,
                    },
                ),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthServices {
    pub mysql: bool,
    pub redis: bool,
}

/// Body of `/health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub service: String,
    pub time: DateTime<Utc>,
    pub checked_at: DateTime<Utc>,
    pub cached: bool,
    pub services: HealthServices,
}

impl HealthReport {
    pub fn new(app_name: &str, snapshot: &StatusSnapshot, cached: bool) -> Self {
        Self {
            status: snapshot.status(),
            service: app_name.to_string(),
            time: Utc::now(),
            checked_at: snapshot.checked_at,
            cached,
            services: HealthServices {
                mysql: snapshot.database.is_connected(),
                redis: snapshot.cache.is_connected(),
            },
        }
    }
}
