//! Timeout wrapper for time-limited acquisition.

use purl_core::{AcquisitionError, DataSource, Payload};
use std::time::Duration;
use tokio::time::timeout;

/// A source that fails with [`AcquisitionError::Timeout`] when the inner
/// source takes longer than `duration`.
pub struct TimeoutSource<S> {
    inner: S,
    duration: Duration,
}

impl<S> TimeoutSource<S> {
    /// Create a new timeout source.
    pub fn new(inner: S, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<S: DataSource> DataSource for TimeoutSource<S> {
    async fn acquire(&self) -> Result<Payload, AcquisitionError> {
        with_timeout(&self.inner, self.duration).await
    }
}

/// Acquire from `source`, giving up after `limit`.
pub async fn with_timeout<S: DataSource>(
    source: &S,
    limit: Duration,
) -> Result<Payload, AcquisitionError> {
    match timeout(limit, source.acquire()).await {
        Ok(result) => result,
        Err(_) => Err(AcquisitionError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let slow = || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AcquisitionError>(json!({}))
        };
        let source = TimeoutSource::new(slow, Duration::from_millis(100));

        let err = source.acquire().await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Timeout(d) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_fast_source_passes_through() {
        let fast = || async { Ok::<_, AcquisitionError>(json!({"name": "Ada"})) };
        let source = TimeoutSource::new(fast, Duration::from_secs(1));

        assert_eq!(source.acquire().await.unwrap(), json!({"name": "Ada"}));
    }
}
