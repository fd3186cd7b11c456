//! # Render Boundary (Template)
//!
//! The templating capability accepts a declarative [`Node`] description and a
//! live DOM root, and patches the root to match. Purl treats it as an external
//! collaborator; `purl-std` ships an in-memory implementation.

use crate::{error::RenderError, node::Node};

/// Summary of one patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchReport {
    /// Number of DOM mutations applied.
    pub mutations: usize,
}

impl PatchReport {
    /// Whether the patch left the DOM untouched.
    pub fn is_noop(&self) -> bool {
        self.mutations == 0
    }
}

/// Patches a live DOM root to match a description.
///
/// # Contract
///
/// - Patching with the description already reflected by the root applies no
///   mutations.
/// - On error the root must be left exactly as it was before the call; the
///   caller keeps displaying the last good DOM.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Template`",
    label = "missing `Template` implementation",
    note = "Templates must implement `patch` for their `Root` type."
)]
pub trait Template: Send + 'static {
    /// The live DOM subtree this template patches.
    type Root: Send + 'static;

    /// Patch `root` to match `description`.
    fn patch(&mut self, root: &mut Self::Root, description: &Node)
    -> Result<PatchReport, RenderError>;
}
