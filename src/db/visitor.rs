use crate::models;
use sqlx::MySqlConnection;
use tracing::Instrument;

pub const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS visitors (
        id INT AUTO_INCREMENT PRIMARY KEY,
        ip_address VARCHAR(45) NOT NULL,
        visit_time TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

pub async fn current_database(conn: &mut MySqlConnection) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<String>>("SELECT DATABASE()")
        .fetch_one(conn)
        .await
}

/// No-op when the table already exists.
pub async fn ensure_schema(conn: &mut MySqlConnection) -> Result<(), sqlx::Error> {
    let query_span = tracing::info_span!("Ensure visitors table exists");
    sqlx::query(CREATE_TABLE)
        .execute(conn)
        .instrument(query_span)
        .await
        .map(|_| ())
}

pub async fn insert(conn: &mut MySqlConnection, ip_address: &str) -> Result<u64, sqlx::Error> {
    let query_span = tracing::info_span!("Saving new visitor into the database");
    sqlx::query("INSERT INTO visitors (ip_address) VALUES (?)")
        .bind(ip_address)
        .execute(conn)
        .instrument(query_span)
        .await
        .map(|result| result.last_insert_id())
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })
}

pub async fn count(conn: &mut MySqlConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visitors")
        .fetch_one(conn)
        .await
}

pub async fn fetch_recent(
    conn: &mut MySqlConnection,
    limit: u32,
) -> Result<Vec<models::Visitor>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetch recent visitors", limit);
    sqlx::query_as::<_, models::Visitor>(
        r"SELECT id, ip_address, visit_time FROM visitors ORDER BY visit_time DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(conn)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch visitors: {:?}", e);
        e
    })
}
