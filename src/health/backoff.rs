use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const BACKOFF_STEP_MS: u64 = 100;
const BACKOFF_CAP_MS: u64 = 3000;

/// Delay before reconnect attempt `retry` (1-based): `min(retry * 100, 3000)` ms.
pub fn reconnect_backoff(retry: u32) -> Duration {
    Duration::from_millis((u64::from(retry) * BACKOFF_STEP_MS).min(BACKOFF_CAP_MS))
}

/// Runs `op` once, then up to `max_retries` more times while it fails,
/// sleeping `backoff(retry)` before each retry. Returns the last error.
pub async fn retry_with_backoff<T, E, F, Fut, B>(
    max_retries: u32,
    backoff: B,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    B: Fn(u32) -> Duration,
    E: Display,
{
    let mut retry = 0;
    loop {
        match op(retry).await {
            Ok(value) => return Ok(value),
            Err(err) if retry >= max_retries => return Err(err),
            Err(err) => {
                retry += 1;
                let delay = backoff(retry);
                tracing::warn!(
                    retry,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Reconnecting after failure"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
