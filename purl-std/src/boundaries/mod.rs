//! Standard error boundaries.

mod logging;

pub use logging::LoggingBoundary;
