use serde;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub app_name: String,
    pub app_host: String,
    pub app_port: u16,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub status: StatusSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
    pub require_tls: bool,
    pub ensure_schema: bool,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub tls: bool,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct StatusSettings {
    pub health_mode: HealthMode,
    pub max_age_secs: u64,
}

/// How `/health` obtains its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthMode {
    /// Probe both dependencies on every request.
    Live,
    /// Serve the last snapshot while it is younger than `max_age_secs`.
    Cached,
}

/// Schemas owned by the MySQL server itself.
const SYSTEM_SCHEMAS: &[&str] = &["mysql", "information_schema", "performance_schema", "sys"];

impl DatabaseSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// True for the server's own schemas, including the `mysql` default.
    pub fn is_system_schema(&self) -> bool {
        SYSTEM_SCHEMAS
            .iter()
            .any(|schema| schema.eq_ignore_ascii_case(&self.database_name))
    }
}

impl RedisSettings {
    /// Built field by field; nothing here goes through URL parsing.
    pub fn connection_info(&self) -> redis::ConnectionInfo {
        let host = self
            .host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let addr = if self.tls {
            redis::ConnectionAddr::TcpTls {
                host,
                port: self.port,
                insecure: false,
                tls_params: None,
            }
        } else {
            redis::ConnectionAddr::Tcp(host, self.port)
        };
        let password = self.password.clone().filter(|p| !p.is_empty());

        redis::ConnectionInfo {
            addr,
            redis: redis::RedisConnectionInfo {
                password,
                ..Default::default()
            },
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl StatusSettings {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

/// Environment variable -> settings key.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_NAME", "app_name"),
    ("APP_HOST", "app_host"),
    ("APP_PORT", "app_port"),
    ("MYSQL_HOST", "database.host"),
    ("MYSQL_PORT", "database.port"),
    ("MYSQL_USER", "database.username"),
    ("MYSQL_PASSWORD", "database.password"),
    ("MYSQL_DATABASE", "database.database_name"),
    ("MYSQL_TLS", "database.require_tls"),
    ("MYSQL_ENSURE_SCHEMA", "database.ensure_schema"),
    ("MYSQL_CONNECT_TIMEOUT_SECS", "database.connect_timeout_secs"),
    ("REDIS_HOST", "redis.host"),
    ("REDIS_PORT", "redis.port"),
    ("REDIS_PASSWORD", "redis.password"),
    ("REDIS_TLS", "redis.tls"),
    ("REDIS_CONNECT_TIMEOUT_SECS", "redis.connect_timeout_secs"),
    ("REDIS_MAX_RETRIES", "redis.max_retries"),
    ("HEALTH_MODE", "status.health_mode"),
    ("STATUS_MAX_AGE_SECS", "status.max_age_secs"),
];

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn with_defaults() -> Result<Builder, config::ConfigError> {
    config::Config::builder()
        .set_default("app_name", "healthboard")?
        .set_default("app_host", "0.0.0.0")?
        .set_default("app_port", 3000_i64)?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 3306_i64)?
        .set_default("database.username", "root")?
        .set_default("database.password", "password")?
        // The `mysql` system schema: `/test-mysql` and `/visitors` create their
        // table there unless MYSQL_DATABASE names an application database.
        .set_default("database.database_name", "mysql")?
        .set_default("database.require_tls", false)?
        .set_default("database.ensure_schema", false)?
        .set_default("database.connect_timeout_secs", 10_i64)?
        .set_default("redis.host", "localhost")?
        .set_default("redis.port", 6379_i64)?
        .set_default("redis.tls", false)?
        .set_default("redis.connect_timeout_secs", 10_i64)?
        .set_default("redis.max_retries", 3_i64)?
        .set_default("status.health_mode", "live")?
        .set_default("status.max_age_secs", 30_i64)
}

fn with_env_overrides(
    mut builder: Builder,
    env: &HashMap<String, String>,
) -> Result<Builder, config::ConfigError> {
    for (var, key) in ENV_OVERRIDES {
        let value = env
            .get(*var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        builder = builder.set_override_option(*key, value)?;
    }
    Ok(builder)
}

/// Resolves settings from built-in defaults and the given environment only.
///
/// Every field has a default, so an empty environment always resolves. The
/// only error is a value that cannot be converted, e.g. `APP_PORT=abc`.
pub fn resolve(env: &HashMap<String, String>) -> Result<Settings, config::ConfigError> {
    with_env_overrides(with_defaults()?, env)?
        .build()?
        .try_deserialize()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let env: HashMap<String, String> = std::env::vars().collect();

    // An optional `configuration.{yaml,toml,json}` sits between the defaults
    // and the environment.
    let builder = with_defaults()?
        .add_source(config::File::with_name("configuration").required(false));

    with_env_overrides(builder, &env)?
        .build()?
        .try_deserialize()
}
