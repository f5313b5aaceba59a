//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[arg_shape(crate = "...")]` attribute value into a
//! `TokenStream` that prefixes every runtime path in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed container attribute.
///
/// Defaults to `::argshape` when no override is present.
///
/// # Examples
///
/// ```rust,ignore
/// let default = resolve(None);
/// assert_eq!(default.to_string(), ":: argshape");
///
/// let path: syn::Path = syn::parse_str("my_alias").unwrap();
/// let aliased = resolve(Some(&path));
/// assert_eq!(aliased.to_string(), "my_alias");
/// ```
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::argshape }, |path| quote! { #path })
}
