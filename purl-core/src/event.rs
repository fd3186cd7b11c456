//! Element-level events.

use crate::element::ElementId;

/// Name of the hydration event.
pub const HYDRATED: &str = "hydrated";

/// Emitted once a View is fully rendered and interactive.
///
/// Carries nothing beyond the emitting element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydrated {
    /// The view that hydrated.
    pub element: ElementId,
}

impl Hydrated {
    /// The stable event name, [`HYDRATED`].
    pub const fn name(&self) -> &'static str {
        HYDRATED
    }
}
