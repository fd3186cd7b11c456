//! # Capability Contract (Element)
//!
//! Every View and Component implements [`Element`]: two required operations,
//! the knitter ([`Element::reconcile`]) and the projection used by the state
//! renderer ([`Element::render`]).
//!
//! Elements never hold their own data. Attributes, model and state are owned
//! by the lifecycle helper that hosts the element, and a render only ever sees
//! them through a [`Scope`].

use crate::{error::KnitError, knit::Payload, node::Node};
use std::{
    fmt::{self, Debug},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// The capability set every View/Component implements.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Element`",
    label = "missing `Element` implementation",
    note = "Elements must implement `reconcile` and `render`."
)]
pub trait Element: Send + Sync + 'static {
    /// Values handed down by the parent element.
    type Attributes: Clone + PartialEq + Default + Debug + Send + Sync + 'static;
    /// Knitted snapshot of server data.
    type Model: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// Local, client-only data. Created from `Default` at mount.
    type State: Default + Send + Sync + 'static;

    /// Custom element name, e.g. `"user-card"`.
    const TAG: &'static str;

    /// Reconcile a server payload into a new model (the `kd` hook).
    ///
    /// Must be deterministic. Malformed fields should be coerced or defaulted;
    /// return an error only when the payload is unusable as a whole.
    fn reconcile(
        &self,
        previous: Option<&Self::Model>,
        payload: &Payload,
    ) -> Result<Self::Model, KnitError>;

    /// Describe the DOM for the current triple (the `sc` projection).
    fn render(&self, scope: Scope<'_, Self>) -> Node;
}

/// Read-only view of the (attributes, model, state) triple.
pub struct Scope<'a, E: Element + ?Sized> {
    /// Attributes from the parent.
    pub attributes: &'a E::Attributes,
    /// The current model, absent until the first successful knit.
    pub model: Option<&'a E::Model>,
    /// Local state.
    pub state: &'a E::State,
}

impl<E: Element + ?Sized> Clone for Scope<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Element + ?Sized> Copy for Scope<'_, E> {}

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Identifies one element instance.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ElementId {
    tag: Arc<str>,
    serial: u64,
}

impl ElementId {
    /// Allocate a fresh id for an instance of `tag`.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: Arc::from(tag),
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The element's tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Process-unique instance number.
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}#{}>", self.tag, self.serial)
    }
}

impl Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Whether `name` is a valid custom element name.
///
/// The name must start with a lowercase ASCII letter, contain a hyphen,
/// contain no uppercase ASCII letters, and not be one of the reserved
/// hyphenated names.
pub fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() || !name.contains('-') {
        return false;
    }
    if RESERVED_NAMES.contains(&name) {
        return false;
    }
    chars.all(|c| {
        matches!(c, 'a'..='z' | '0'..='9' | '-' | '.' | '_') || (!c.is_ascii() && !c.is_whitespace())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_element_names() {
        assert!(is_valid_custom_element_name("user-card"));
        assert!(is_valid_custom_element_name("x-1"));
        assert!(is_valid_custom_element_name("math-α"));
        assert!(!is_valid_custom_element_name("usercard"));
        assert!(!is_valid_custom_element_name("User-card"));
        assert!(!is_valid_custom_element_name("user-Card"));
        assert!(!is_valid_custom_element_name("1-card"));
        assert!(!is_valid_custom_element_name("font-face"));
        assert!(!is_valid_custom_element_name(""));
    }

    #[test]
    fn test_element_ids_are_unique() {
        let a = ElementId::new("user-card");
        let b = ElementId::new("user-card");
        assert_ne!(a, b);
        assert_eq!(a.tag(), "user-card");
        assert!(a.to_string().starts_with("<user-card#"));
    }
}
