//! Per-element lifecycle helper.
//!
//! Views and Components do not inherit from a base element. Each holds an
//! [`Instance`], which owns the element's attributes, model and state together
//! with its DOM root, and runs the knit and render steps against them.
//!
//! # Invariants
//!
//! - The model is only replaced by [`Instance::knit`], wholesale.
//! - A payload equal to the last knitted one never reaches `reconcile`.
//! - A knit that yields an equal model keeps the existing `Arc`.
//! - A description equal to the last rendered one never reaches the template.
//! - A failed knit keeps the previous model; a failed patch keeps the last
//!   good DOM.

use purl_core::{
    Element, ElementId, KnitError, Node, PatchReport, Payload, PurlError, RenderError, Scope,
    Template,
};
use std::sync::Arc;

/// What a knit did to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnitOutcome {
    /// A new model snapshot replaced the previous one.
    Replaced,
    /// The model was left as it was.
    Unchanged,
}

/// Counters for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceStats {
    /// Calls to [`Element::reconcile`].
    pub knits: u64,
    /// Calls to [`Element::render`].
    pub renders: u64,
    /// Calls to [`Template::patch`].
    pub patches: u64,
    /// DOM mutations applied across all patches.
    pub mutations: u64,
}

/// Owns one element's data and render cycle.
pub struct Instance<E: Element, T: Template> {
    id: ElementId,
    element: E,
    template: T,
    root: T::Root,
    attributes: E::Attributes,
    state: E::State,
    model: Option<Arc<E::Model>>,
    last_payload: Option<Payload>,
    rendered: Option<Node>,
    stats: InstanceStats,
}

impl<E: Element, T: Template> Instance<E, T> {
    /// Create an instance with default state and no model.
    pub fn new(element: E, template: T, root: T::Root, attributes: E::Attributes) -> Self {
        Self {
            id: ElementId::new(E::TAG),
            element,
            template,
            root,
            attributes,
            state: E::State::default(),
            model: None,
            last_payload: None,
            rendered: None,
            stats: InstanceStats::default(),
        }
    }

    /// This instance's id.
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// The hosted element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Current attributes.
    pub fn attributes(&self) -> &E::Attributes {
        &self.attributes
    }

    /// Current model snapshot.
    pub fn model(&self) -> Option<&Arc<E::Model>> {
        self.model.as_ref()
    }

    /// Current state.
    pub fn state(&self) -> &E::State {
        &self.state
    }

    /// The live DOM root.
    pub fn root(&self) -> &T::Root {
        &self.root
    }

    /// Counters.
    pub fn stats(&self) -> InstanceStats {
        self.stats
    }

    /// The description reflected by the DOM after the last successful patch.
    pub fn rendered(&self) -> Option<&Node> {
        self.rendered.as_ref()
    }

    /// Knit `payload` into the model.
    pub fn knit(&mut self, payload: &Payload) -> Result<KnitOutcome, KnitError> {
        if self.last_payload.as_ref() == Some(payload) {
            tracing::debug!(element = %self.id, "payload unchanged, knit skipped");
            return Ok(KnitOutcome::Unchanged);
        }

        self.stats.knits += 1;
        let previous = self.model.as_deref();
        let next = self.element.reconcile(previous, payload)?;
        self.last_payload = Some(payload.clone());

        if previous == Some(&next) {
            tracing::debug!(element = %self.id, "knit produced an equal model");
            return Ok(KnitOutcome::Unchanged);
        }
        self.model = Some(Arc::new(next));
        tracing::debug!(element = %self.id, knits = self.stats.knits, "model replaced");
        Ok(KnitOutcome::Replaced)
    }

    /// Project the current triple and patch the DOM.
    ///
    /// Returns an empty report when the description did not change.
    pub fn render(&mut self) -> Result<PatchReport, RenderError> {
        self.stats.renders += 1;
        let description = self.element.render(Scope {
            attributes: &self.attributes,
            model: self.model.as_deref(),
            state: &self.state,
        });

        if self.rendered.as_ref() == Some(&description) {
            return Ok(PatchReport::default());
        }

        self.stats.patches += 1;
        let report = self.template.patch(&mut self.root, &description)?;
        self.stats.mutations += report.mutations as u64;
        self.rendered = Some(description);
        tracing::trace!(element = %self.id, mutations = report.mutations, "patched");
        Ok(report)
    }

    /// Knit a payload and re-render if the model changed.
    ///
    /// `Ok(None)` means nothing changed and nothing was rendered.
    pub fn apply(&mut self, payload: &Payload) -> Result<Option<PatchReport>, PurlError> {
        match self.knit(payload)? {
            KnitOutcome::Unchanged => Ok(None),
            KnitOutcome::Replaced => Ok(Some(self.render()?)),
        }
    }

    /// Mutate state without rendering.
    pub fn mutate_state<R>(&mut self, f: impl FnOnce(&mut E::State) -> R) -> R {
        f(&mut self.state)
    }

    /// Mutate state, then render. Never knits.
    pub fn update_state<R>(
        &mut self,
        f: impl FnOnce(&mut E::State) -> R,
    ) -> (R, Result<PatchReport, RenderError>) {
        let out = f(&mut self.state);
        (out, self.render())
    }

    /// Replace attributes. Returns `false` if they were equal to the current ones.
    pub fn replace_attributes(&mut self, attributes: E::Attributes) -> bool {
        if self.attributes == attributes {
            return false;
        }
        self.attributes = attributes;
        true
    }

    /// Discard model and state, as on unmount. The DOM root is kept.
    pub fn reset(&mut self) {
        self.model = None;
        self.last_payload = None;
        self.state = E::State::default();
        self.rendered = None;
    }

    /// Give up the DOM root.
    pub fn into_root(self) -> T::Root {
        self.root
    }
}
