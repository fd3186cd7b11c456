//! # purl - Data/Render Lifecycle for Custom Elements
//!
//! `purl` hosts two kinds of custom elements: **Views**, one per navigable
//! page, and **Components**, reusable fragments mounted by a parent. Both
//! implement the same capability contract, [`Element`]:
//!
//! - `reconcile` (`kd`): knit immutable server data into a model snapshot
//! - `render` (`sc`): project (attributes, model, state) into a DOM description
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use purl::{DiffTemplate, Element, Knit, MemoryDom, Node, Payload, Scope, View};
//!
//! #[derive(Debug, Clone, PartialEq, Knit)]
//! struct Profile {
//!     name: String,
//! }
//!
//! struct ProfilePage;
//!
//! impl Element for ProfilePage {
//!     type Attributes = ();
//!     type Model = Profile;
//!     type State = ();
//!     const TAG: &'static str = "profile-page";
//!
//!     fn reconcile(&self, previous: Option<&Profile>, payload: &Payload) -> Result<Profile, purl::KnitError> {
//!         Profile::knit(previous, payload)
//!     }
//!
//!     fn render(&self, scope: Scope<'_, Self>) -> Node {
//!         let name = scope.model.map(|m| m.name.clone()).unwrap_or_default();
//!         Node::element("h1").child(Node::text(name))
//!     }
//! }
//!
//! let view = View::builder(ProfilePage, DiffTemplate, MemoryDom::new(), fetch_profile).build()?;
//! view.connected().await;        // acquire -> knit -> render -> hydrated
//! view.push(json!({ "name": "Grace" }));
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! connected -> acquire -> knit -> render -> hydrated
//!                          ^        ^
//!     push / listen -------+        +------- update_state / set_attributes
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use purl_core::{
    // Errors
    AcquisitionError,
    // Data boundary
    BoxSource,
    BoxError,
    Coerce,
    DataSource,
    DynSource,
    // Element contract
    Element,
    ElementId,
    ElementNode,
    // Boundaries
    ErrorBoundary,
    // Events
    HYDRATED,
    Hydrated,
    IgnoreErrors,
    // Knitting
    Knit,
    KnitError,
    MapSource,
    // Render boundary
    Node,
    PatchReport,
    Payload,
    PurlError,
    RenderError,
    Scope,
    Template,
    is_valid_custom_element_name,
    is_valid_tag,
    knit,
};

// Lifecycle
pub use purl_std::{
    Component, Instance, InstanceStats, KnitOutcome, MountConfig, MountOutcome, PushOutcome,
    Status, View, ViewBuilder,
};

// Hydration
pub use purl_std::{HydrationSignal, Subscription};

// Rendering
pub use purl_std::{DiffTemplate, MemoryDom, Mutation, dom};

// Sources and boundaries
pub use purl_std::{LoggingBoundary, StaticSource, sources};

/// Testing utilities.
pub use purl_std::testing;

#[cfg(feature = "macros")]
pub use purl_macros::Knit;
