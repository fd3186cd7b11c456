//! Error boundaries: the recoverable error-display pathway.
//!
//! Failures never cross element boundaries as panics or unhandled errors. The
//! host catches them and hands them to an [`ErrorBoundary`] together with the
//! id of the element that failed.

use crate::{element::ElementId, error::PurlError};
use std::sync::Arc;

/// Receives failures surfaced by elements.
pub trait ErrorBoundary: Send + Sync + 'static {
    /// Called once per surfaced failure.
    fn report(&self, element: &ElementId, error: &PurlError);
}

impl<B: ErrorBoundary + ?Sized> ErrorBoundary for Arc<B> {
    fn report(&self, element: &ElementId, error: &PurlError) {
        (**self).report(element, error)
    }
}

impl<B: ErrorBoundary + ?Sized> ErrorBoundary for Box<B> {
    fn report(&self, element: &ElementId, error: &PurlError) {
        (**self).report(element, error)
    }
}

/// A boundary that swallows every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreErrors;

impl ErrorBoundary for IgnoreErrors {
    fn report(&self, _element: &ElementId, _error: &PurlError) {}
}
