//! Logging boundary for failure observation.

use purl_core::{ElementId, ErrorBoundary, PurlError};

/// An error boundary that logs every reported failure.
///
/// Acquisition failures are logged at `warn` (the element degrades and keeps
/// working); knit and render failures at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBoundary;

impl ErrorBoundary for LoggingBoundary {
    fn report(&self, element: &ElementId, error: &PurlError) {
        match error {
            PurlError::Acquisition(err) => {
                tracing::warn!(%element, error = %err, "data acquisition failed");
            }
            other => {
                tracing::error!(%element, error = %other, "element failure");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purl_core::{AcquisitionError, RenderError};

    #[test]
    fn test_logging_boundary_reports_without_panicking() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let element = ElementId::new("user-page");
        LoggingBoundary.report(&element, &AcquisitionError::Server { status: 503 }.into());
        LoggingBoundary.report(&element, &RenderError::InvalidTag("x y".into()).into());
    }
}
