mod common;

use healthboard::configuration::DatabaseSettings;
use healthboard::connectors::{CacheConnector, DatabaseConnector, MySqlConnector, RedisConnector};
use healthboard::db;
use healthboard::health::ProbeResult;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, MySqlConnection};

async fn connect(settings: &DatabaseSettings) -> MySqlConnection {
    let options = MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.username)
        .password(&settings.password)
        .database(&settings.database_name);
    MySqlConnection::connect_with(&options)
        .await
        .expect("Failed to connect to the test database")
}

#[tokio::test]
async fn database_probe_names_the_selected_database() {
    let settings = match common::live_database().await {
        Some(settings) => settings,
        None => return,
    };
    let connector = MySqlConnector::new(settings.clone());

    match connector.probe().await {
        ProbeResult::Connected(detail) => {
            assert_eq!(detail, format!("Database: {}", settings.database_name))
        }
        ProbeResult::Disconnected(failure) => panic!("expected connected, got {:?}", failure),
    }
}

#[tokio::test]
async fn ensure_schema_twice_is_a_no_op() {
    let mut settings = match common::live_database().await {
        Some(settings) => settings,
        None => return,
    };
    settings.ensure_schema = true;
    let connector = MySqlConnector::new(settings.clone());

    assert!(connector.probe().await.is_connected());
    assert!(connector.probe().await.is_connected());

    let mut conn = connect(&settings).await;
    db::visitor::ensure_schema(&mut conn)
        .await
        .expect("second create-if-absent must succeed");
    assert_eq!(db::visitor::count(&mut conn).await.unwrap(), 0);
    let _ = conn.close().await;
}

#[tokio::test]
async fn record_visit_returns_insert_id_and_row_count() {
    let settings = match common::live_database().await {
        Some(settings) => settings,
        None => return,
    };
    let connector = MySqlConnector::new(settings);

    let first = connector.record_visit("10.0.0.1").await.unwrap();
    let second = connector.record_visit("10.0.0.2").await.unwrap();

    assert!(first.insert_id > 0);
    assert!(second.insert_id > first.insert_id);
    assert_eq!(first.total_visits, 1);
    assert_eq!(second.total_visits, 2);
}

#[tokio::test]
async fn recent_visitors_are_limited_and_newest_first() {
    let settings = match common::live_database().await {
        Some(settings) => settings,
        None => return,
    };
    let connector = MySqlConnector::new(settings);

    let mut last_id = 0;
    for i in 0..12 {
        last_id = connector
            .record_visit(&format!("10.0.0.{}", i))
            .await
            .unwrap()
            .insert_id;
    }

    let visitors = connector.recent_visitors(10).await.unwrap();

    assert_eq!(visitors.len(), 10);
    assert_eq!(visitors[0].id as u64, last_id);
    assert_eq!(visitors[0].ip_address, "10.0.0.11");
    for pair in visitors.windows(2) {
        assert!(pair[0].visit_time >= pair[1].visit_time);
        assert!(pair[0].id > pair[1].id);
    }
}

#[tokio::test]
async fn cache_probe_reads_back_the_sentinel() {
    let settings = match common::live_cache().await {
        Some(settings) => settings,
        None => return,
    };
    let connector = RedisConnector::new(settings);

    match connector.probe().await {
        ProbeResult::Connected(detail) => assert!(detail.starts_with("Test Value: ")),
        ProbeResult::Disconnected(failure) => panic!("expected connected, got {:?}", failure),
    }
}

#[tokio::test]
async fn view_counter_increments_by_one() {
    let settings = match common::live_cache().await {
        Some(settings) => settings,
        None => return,
    };
    let connector = RedisConnector::new(settings);

    let before = connector.increment_views("127.0.0.1").await.unwrap();
    let after = connector.increment_views("127.0.0.1").await.unwrap();

    assert_eq!(after, before + 1);
}
