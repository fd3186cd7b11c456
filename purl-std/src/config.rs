//! Mount configuration for views.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for a [`View`](crate::view::View)'s lifecycle.
///
/// Deserializable so hosts can ship it alongside their route table:
///
/// ```rust,ignore
/// let config: MountConfig = serde_json::from_str(r#"{ "push_batch": 4 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Upper bound on the initial acquisition. Requires the `timeout` feature.
    pub acquire_timeout: Option<Duration>,
    /// Maximum number of ready pushes collapsed into one knit.
    pub push_batch: usize,
    /// Hold the newest push that arrives while the mount is in flight and
    /// apply it after hydration. When `false`, such pushes are ignored.
    pub hold_pending_pushes: bool,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            acquire_timeout: None,
            push_batch: 16,
            hold_pending_pushes: true,
        }
    }
}

impl MountConfig {
    /// Set the acquisition timeout.
    pub fn with_acquire_timeout(mut self, limit: Duration) -> Self {
        self.acquire_timeout = Some(limit);
        self
    }

    /// Set the push batch size. Zero is treated as one.
    pub fn with_push_batch(mut self, batch: usize) -> Self {
        self.push_batch = batch;
        self
    }

    /// Choose whether pushes during mount are held.
    pub fn hold_pending_pushes(mut self, hold: bool) -> Self {
        self.hold_pending_pushes = hold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: MountConfig = serde_json::from_str(r#"{ "push_batch": 4 }"#).unwrap();
        assert_eq!(config.push_batch, 4);
        assert!(config.hold_pending_pushes);
        assert_eq!(config.acquire_timeout, None);
    }

    #[test]
    fn test_builder() {
        let config = MountConfig::default()
            .with_acquire_timeout(Duration::from_millis(250))
            .hold_pending_pushes(false);
        assert_eq!(config.acquire_timeout, Some(Duration::from_millis(250)));
        assert!(!config.hold_pending_pushes);
    }
}
