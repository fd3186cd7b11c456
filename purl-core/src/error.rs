//! Error types for Purl.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`PurlError`] - Top-level error type reported to error boundaries
//! - [`AcquisitionError`] - Data acquisition failures (initial fetch or push)
//! - [`KnitError`] - Payloads the knitter cannot use at all
//! - [`RenderError`] - Failures of the templating capability

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Purl operations.
#[derive(Error, Debug)]
pub enum PurlError {
    /// Data could not be acquired from the server.
    #[error("acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// A payload was structurally unusable.
    #[error("knit failed: {0}")]
    Knit(#[from] KnitError),

    /// The templating capability failed to patch the DOM.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// The element tag is not a valid custom element name.
    #[error("invalid custom element name: {0:?}")]
    InvalidName(String),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while acquiring a server payload.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The transport failed before a response arrived.
    #[error("transport error")]
    Transport(#[source] BoxError),

    /// The server answered with an error status.
    #[error("server responded with status {status}")]
    Server {
        /// Status code reported by the server.
        status: u16,
    },

    /// The acquisition did not complete in time.
    #[error("acquisition timed out after {0:?}")]
    Timeout(Duration),

    /// The source was closed and will not produce more payloads.
    #[error("data source closed")]
    Closed,

    /// A custom acquisition error.
    #[error(transparent)]
    Custom(BoxError),
}

/// Raised when a payload cannot be knitted into a model at all.
///
/// Malformed individual fields never produce this error; they are coerced or
/// defaulted. Only an unusable top-level shape does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnitError {
    /// The payload's top-level shape does not match the model.
    #[error("expected {expected} payload, found {found}")]
    Shape {
        /// Shape the model requires (e.g. `"object"`).
        expected: &'static str,
        /// Shape that actually arrived.
        found: &'static str,
    },

    /// A custom knit error.
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the templating capability.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The description contains a tag that is not a valid element name.
    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    /// The template implementation failed.
    #[error("template error")]
    Template(#[source] BoxError),
}

impl KnitError {
    /// Build a shape error for a payload that is not of the expected kind.
    pub fn shape(expected: &'static str, payload: &serde_json::Value) -> Self {
        KnitError::Shape {
            expected,
            found: crate::knit::kind_of(payload),
        }
    }
}

// Convenience conversions
impl From<BoxError> for PurlError {
    fn from(err: BoxError) -> Self {
        PurlError::Custom(err)
    }
}

impl From<BoxError> for AcquisitionError {
    fn from(err: BoxError) -> Self {
        AcquisitionError::Custom(err)
    }
}

impl From<BoxError> for RenderError {
    fn from(err: BoxError) -> Self {
        RenderError::Template(err)
    }
}
