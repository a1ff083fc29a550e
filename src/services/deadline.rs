//! Deadline for collaborator calls made from inside a guard.
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallError<E: std::error::Error + 'static> {
    #[error("{0} timed out")]
    TimedOut(&'static str),
    #[error(transparent)]
    Failed(E),
}

/// Run `fut` under `limit`. A timeout is logged here; callers treat it like any other
/// failure of the same call.
pub async fn bounded<F, T, E>(call: &'static str, limit: Duration, fut: F) -> Result<T, CallError<E>>
where
    F: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(CallError::Failed),
        Err(_) => {
            tracing::warn!(
                call,
                timeout_ms = limit.as_millis() as u64,
                "external call timed out"
            );
            Err(CallError::TimedOut(call))
        }
    }
}
