use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the `visitors` table. Rows are only ever inserted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Visitor {
    pub id: i32,
    pub ip_address: String, // caller address as seen by the server, without port
    pub visit_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VisitReceipt {
    pub insert_id: u64,
    pub total_visits: i64,
}
