use super::checks::HealthChecker;
use super::models::StatusSnapshot;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Last snapshot taken by any route. Readers state how old a snapshot they
/// accept; nothing is served past that age.
#[derive(Default)]
pub struct StatusCache {
    latest: RwLock<Option<StatusSnapshot>>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, snapshot: StatusSnapshot) {
        let mut latest = self.latest.write().await;
        *latest = Some(snapshot);
    }

    /// The cached snapshot, if it is younger than `max_age`.
    pub async fn fresh(&self, max_age: Duration) -> Option<StatusSnapshot> {
        let latest = self.latest.read().await;
        latest
            .as_ref()
            .filter(|snapshot| {
                snapshot
                    .age(Utc::now())
                    .to_std()
                    .map(|age| age < max_age)
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// Probes, stores and returns a new snapshot.
    pub async fn refresh(&self, checker: &HealthChecker) -> StatusSnapshot {
        let snapshot = checker.snapshot().await;
        self.store(snapshot.clone()).await;
        snapshot
    }

    /// Returns `(snapshot, from_cache)`.
    pub async fn get_or_refresh(
        &self,
        checker: &HealthChecker,
        max_age: Duration,
    ) -> (StatusSnapshot, bool) {
        match self.fresh(max_age).await {
            Some(snapshot) => (snapshot, true),
            None => (self.refresh(checker).await, false),
        }
    }
}
