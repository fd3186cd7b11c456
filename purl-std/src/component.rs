//! Reusable UI fragments.
//!
//! A [`Component`] is mounted synchronously by its parent, which hands it
//! attributes directly. It reuses the knit and render steps of an
//! [`Instance`] but has no data acquisition and no hydration signal.

use crate::{
    boundaries::LoggingBoundary,
    instance::{Instance, InstanceStats},
    view::PushOutcome,
};
use purl_core::{
    Element, ElementId, ErrorBoundary, PatchReport, Payload, PurlError, Template,
    is_valid_custom_element_name,
};
use std::sync::Arc;

/// A mounted component owned by its parent.
pub struct Component<E: Element, T: Template> {
    instance: Instance<E, T>,
    boundary: Box<dyn ErrorBoundary>,
}

impl<E: Element, T: Template> Component<E, T> {
    /// Mount a component and paint it. Failures go to a [`LoggingBoundary`].
    pub fn mount(
        element: E,
        template: T,
        root: T::Root,
        attributes: E::Attributes,
    ) -> Result<Self, PurlError> {
        Self::mount_with_boundary(element, template, root, attributes, LoggingBoundary)
    }

    /// Mount a component reporting failures to `boundary`.
    ///
    /// Only an invalid `E::TAG` fails the mount; a failed first paint is
    /// reported and leaves the root as it was.
    pub fn mount_with_boundary(
        element: E,
        template: T,
        root: T::Root,
        attributes: E::Attributes,
        boundary: impl ErrorBoundary,
    ) -> Result<Self, PurlError> {
        if !is_valid_custom_element_name(E::TAG) {
            return Err(PurlError::InvalidName(E::TAG.to_string()));
        }
        let mut component = Self {
            instance: Instance::new(element, template, root, attributes),
            boundary: Box::new(boundary),
        };
        let result = component.instance.render().map_err(PurlError::from);
        component.settle(result);
        tracing::debug!(element = %component.id(), "component mounted");
        Ok(component)
    }

    /// This component's id.
    pub fn id(&self) -> &ElementId {
        self.instance.id()
    }

    /// Replace attributes and re-render if they changed.
    pub fn set_attributes(&mut self, attributes: E::Attributes) -> Option<PatchReport> {
        if !self.instance.replace_attributes(attributes) {
            return Some(PatchReport::default());
        }
        let result = self.instance.render().map_err(PurlError::from);
        self.settle(result)
    }

    /// Mutate local state and re-render. Never knits.
    pub fn update_state(&mut self, f: impl FnOnce(&mut E::State)) -> Option<PatchReport> {
        let ((), result) = self.instance.update_state(f);
        self.settle(result.map_err(PurlError::from))
    }

    /// Knit server data handed down to this component.
    pub fn push(&mut self, payload: &Payload) -> PushOutcome {
        match self.instance.apply(payload) {
            Ok(Some(report)) => PushOutcome::Rendered(report),
            Ok(None) => PushOutcome::Unchanged,
            Err(error) => {
                self.report(&error);
                PushOutcome::Failed
            }
        }
    }

    /// Current model snapshot.
    pub fn model(&self) -> Option<&Arc<E::Model>> {
        self.instance.model()
    }

    /// Counters for this component.
    pub fn stats(&self) -> InstanceStats {
        self.instance.stats()
    }

    /// The underlying instance.
    pub fn instance(&self) -> &Instance<E, T> {
        &self.instance
    }

    /// The live DOM root.
    pub fn root(&self) -> &T::Root {
        self.instance.root()
    }

    /// Remove the component, discarding model and state. Returns the DOM root.
    pub fn unmount(self) -> T::Root {
        tracing::debug!(element = %self.id(), "component unmounted");
        self.instance.into_root()
    }

    fn settle(&self, result: Result<PatchReport, PurlError>) -> Option<PatchReport> {
        match result {
            Ok(report) => Some(report),
            Err(error) => {
                self.report(&error);
                None
            }
        }
    }

    fn report(&self, error: &PurlError) {
        tracing::warn!(element = %self.id(), %error, "component update failed");
        self.boundary.report(self.id(), error);
    }
}
