//! Standard data sources and source wrappers.

#[cfg(feature = "timeout")]
pub mod timeout;

mod fixed;

pub use fixed::StaticSource;
#[cfg(feature = "timeout")]
pub use timeout::{TimeoutSource, with_timeout};
