//! A source that always yields the same payload.

use purl_core::{AcquisitionError, DataSource, Payload};

/// Acquires a fixed payload. Useful for static pages and prerendered data.
#[derive(Debug, Clone)]
pub struct StaticSource {
    payload: Payload,
}

impl StaticSource {
    /// A source yielding `payload` on every acquisition.
    pub fn new(payload: Payload) -> Self {
        Self { payload }
    }
}

impl DataSource for StaticSource {
    async fn acquire(&self) -> Result<Payload, AcquisitionError> {
        Ok(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_source_repeats() {
        let source = StaticSource::new(json!({ "title": "About" }));
        assert_eq!(source.acquire().await.unwrap(), json!({ "title": "About" }));
        assert_eq!(source.acquire().await.unwrap(), json!({ "title": "About" }));
    }
}
