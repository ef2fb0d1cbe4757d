use super::{CacheConnector, ConnectorError, DatabaseConnector};
use crate::health::{ProbeFailure, ProbeResult};
use crate::models::{VisitReceipt, Visitor};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

fn refused() -> ProbeFailure {
    ProbeFailure::connection(Some("ConnectionRefused".to_string()), "Connection refused")
}

pub struct MockDatabaseConnector {
    up: bool,
    pub probes: AtomicUsize,
    visitors: Mutex<Vec<Visitor>>,
}

impl MockDatabaseConnector {
    pub fn connected() -> Self {
        Self {
            up: true,
            probes: AtomicUsize::new(0),
            visitors: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            up: false,
            ..Self::connected()
        }
    }

    fn check_up(&self) -> Result<(), ConnectorError> {
        if self.up {
            Ok(())
        } else {
            Err(ConnectorError::Connection {
                code: Some("ConnectionRefused".to_string()),
                message: "Connection refused".to_string(),
            })
        }
    }
}

#[async_trait]
impl DatabaseConnector for MockDatabaseConnector {
    async fn probe(&self) -> ProbeResult {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.up {
            ProbeResult::Connected("Database: mock".to_string())
        } else {
            ProbeResult::Disconnected(refused())
        }
    }

    async fn record_visit(&self, ip_address: &str) -> Result<VisitReceipt, ConnectorError> {
        self.check_up()?;
        let mut visitors = self.visitors.lock().unwrap();
        let id = visitors.len() as i32 + 1;
        visitors.push(Visitor {
            id,
            ip_address: ip_address.to_string(),
            // keep visit times strictly increasing
            visit_time: Utc::now() + Duration::seconds(id as i64),
        });

        Ok(VisitReceipt {
            insert_id: id as u64,
            total_visits: visitors.len() as i64,
        })
    }

    async fn recent_visitors(&self, limit: u32) -> Result<Vec<Visitor>, ConnectorError> {
        self.check_up()?;
        let mut visitors = self.visitors.lock().unwrap().clone();
        visitors.sort_by(|a, b| b.visit_time.cmp(&a.visit_time).then(b.id.cmp(&a.id)));
        visitors.truncate(limit as usize);
        Ok(visitors)
    }
}

pub struct MockCacheConnector {
    up: bool,
    pub probes: AtomicUsize,
    views: AtomicI64,
}

impl MockCacheConnector {
    pub fn connected() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(views: i64) -> Self {
        Self {
            up: true,
            probes: AtomicUsize::new(0),
            views: AtomicI64::new(views),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            up: false,
            ..Self::connected()
        }
    }
}

#[async_trait]
impl CacheConnector for MockCacheConnector {
    async fn probe(&self) -> ProbeResult {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.up {
            ProbeResult::Connected("Test Value: 2026-01-01T00:00:00+00:00".to_string())
        } else {
            ProbeResult::Disconnected(refused())
        }
    }

    async fn increment_views(&self, _caller: &str) -> Result<i64, ConnectorError> {
        if !self.up {
            return Err(ConnectorError::Connection {
                code: Some("ConnectionRefused".to_string()),
                message: "Connection refused".to_string(),
            });
        }
        Ok(self.views.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
