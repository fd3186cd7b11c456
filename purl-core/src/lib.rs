//! # purl-core
//!
//! Core traits for the Purl view/component lifecycle framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! templating backends and data sources that don't need the full `purl-std`
//! implementation.
//!
//! # Capability Contract
//!
//! Purl hosts two kinds of custom elements: **Views** (one per navigable page)
//! and **Components** (reusable fragments). Both implement [`Element`]:
//!
//! - **Reconcile** (`kd`): knit an immutable server payload into the model
//! - **Render** (`sc`): project (attributes, model, state) into a [`Node`]
//!
//! # Boundaries
//!
//! The lifecycle core talks to the outside world through three seams:
//!
//! - [`DataSource`] - acquires the initial payload
//! - [`Template`] - patches a live DOM root to match a description
//! - [`ErrorBoundary`] - displays failures without crashing the element
//!
//! # Error Types
//!
//! - [`PurlError`] - Top-level error type
//! - [`AcquisitionError`] - Data acquisition failures
//! - [`KnitError`] - Unusable payloads
//! - [`RenderError`] - Template failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod boundary;
mod element;
mod error;
mod event;
pub mod knit;
mod node;
mod source;
mod template;

// Re-exports
pub use boundary::{ErrorBoundary, IgnoreErrors};
pub use element::{Element, ElementId, Scope, is_valid_custom_element_name};
pub use error::{AcquisitionError, BoxError, KnitError, PurlError, RenderError};
pub use event::{HYDRATED, Hydrated};
pub use knit::{Coerce, Knit, Payload};
pub use node::{ElementNode, Node, is_valid_tag};
pub use source::{BoxSource, DataSource, DynSource, MapSource};
pub use template::{PatchReport, Template};
