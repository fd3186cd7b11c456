//! Procedural macros for Purl.
//!
//! - `#[derive(Knit)]` - generates payload-to-model knitting for structs

use proc_macro::TokenStream;

mod knit;

/// Derive `Knit` and `Coerce` for a struct with named fields.
///
/// The payload must be a JSON object. Each field is looked up by name and
/// coerced; missing or malformed fields fall back to their default.
///
/// # Field attributes
///
/// - `#[knit(rename = "key")]` - read the field from `key`
/// - `#[knit(default = expr)]` - fallback value instead of `Default::default()`
/// - `#[knit(sticky)]` - fall back to the previous model's value first
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Clone, PartialEq, purl::Knit)]
/// struct Profile {
///     name: String,
///     #[knit(rename = "unreadCount")]
///     unread: u32,
///     #[knit(sticky)]
///     avatar: Option<String>,
/// }
/// ```
#[proc_macro_derive(Knit, attributes(knit))]
pub fn derive_knit(input: TokenStream) -> TokenStream {
    knit::derive_knit_impl(input)
}
