#![allow(dead_code)]

use healthboard::configuration::{self, DatabaseSettings, RedisSettings, Settings};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, MySqlConnection};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

static DATABASE_SEQ: AtomicU32 = AtomicU32::new(0);

pub struct TestApp {
    pub address: String,
}

/// Settings whose dependencies point at a closed local port, so every probe
/// fails fast without any infrastructure.
pub fn unreachable_dependencies() -> Settings {
    let mut settings =
        configuration::resolve(&HashMap::new()).expect("Failed to resolve default settings");

    settings.database.host = "127.0.0.1".to_string();
    settings.database.port = 1;
    settings.database.connect_timeout_secs = 2;

    settings.redis.host = "127.0.0.1".to_string();
    settings.redis.port = 1;
    settings.redis.connect_timeout_secs = 2;
    settings.redis.max_retries = 0;

    settings
}

pub async fn spawn_app_with_configuration(configuration: Settings) -> TestApp {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = healthboard::startup::run(listener, configuration)
        .await
        .expect("Failed to bind address.");

    let _ = tokio::spawn(server);
    println!("Used Port: {}", port);

    TestApp { address }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_configuration(unreachable_dependencies()).await
}

/// MySQL settings from the environment, pointed at a freshly created
/// database. `None` when no server answers, so the caller can skip.
pub async fn live_database() -> Option<DatabaseSettings> {
    let mut settings = configuration::get_configuration()
        .expect("Failed to get configuration")
        .database;
    settings.connect_timeout_secs = settings.connect_timeout_secs.min(2);

    let server = MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.username)
        .password(&settings.password);

    let mut connection =
        match tokio::time::timeout(settings.connect_timeout(), MySqlConnection::connect_with(&server))
            .await
        {
            Ok(Ok(connection)) => connection,
            Ok(Err(err)) => {
                eprintln!("Skipping test: failed to connect to mysql: {}", err);
                return None;
            }
            Err(_) => {
                eprintln!("Skipping test: mysql did not answer");
                return None;
            }
        };

    settings.database_name = format!(
        "healthboard_test_{}_{}",
        std::process::id(),
        DATABASE_SEQ.fetch_add(1, Ordering::SeqCst)
    );
    let create = format!("CREATE DATABASE `{}`", settings.database_name);
    if let Err(err) = sqlx::query(&create).execute(&mut connection).await {
        eprintln!("Skipping test: failed to create database: {}", err);
        return None;
    }
    let _ = connection.close().await;

    Some(settings)
}

/// Redis settings from the environment. `None` when no server answers.
pub async fn live_cache() -> Option<RedisSettings> {
    let mut settings = configuration::get_configuration()
        .expect("Failed to get configuration")
        .redis;
    settings.connect_timeout_secs = settings.connect_timeout_secs.min(2);
    settings.max_retries = 0;

    let client = match redis::Client::open(settings.connection_info()) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Skipping test: invalid redis settings: {}", err);
            return None;
        }
    };
    match tokio::time::timeout(
        Duration::from_secs(settings.connect_timeout_secs),
        client.get_multiplexed_async_connection(),
    )
    .await
    {
        Ok(Ok(_)) => Some(settings),
        Ok(Err(err)) => {
            eprintln!("Skipping test: failed to connect to redis: {}", err);
            None
        }
        Err(_) => {
            eprintln!("Skipping test: redis did not answer");
            None
        }
    }
}
