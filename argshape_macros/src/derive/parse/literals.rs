//! Literal parsing helpers for derive attributes.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr};

/// Reads the string literal after `key =`.
///
/// Any other literal kind is rejected at its own span so the error points at
/// the offending value.
///
/// # Examples
///
/// ```rust,ignore
/// let attr: syn::Attribute = syn::parse_quote!(#[arg_shape(name = "rate")]);
/// attr.parse_nested_meta(|meta| {
///     assert_eq!(lit_str(&meta, "name")?.value(), "rate");
///     Ok(())
/// })?;
/// ```
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    match meta.value()?.parse::<Lit>()? {
        Lit::Str(text) => Ok(text),
        other => Err(syn::Error::new(
            other.span(),
            format!("`{key}` expects a string literal"),
        )),
    }
}
