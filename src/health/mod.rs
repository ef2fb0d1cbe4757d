mod backoff;
mod checks;
mod models;
mod snapshot_cache;

pub use backoff::{reconnect_backoff, retry_with_backoff};
pub use checks::HealthChecker;
pub use models::{
    FailureKind, OverallStatus, ProbeFailure, ProbeResult, ProcessInfo, StatusSnapshot,
};
pub use snapshot_cache::StatusCache;
