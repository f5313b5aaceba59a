//! Attribute parsing for the `ArgShape` derive macro.

use syn::meta::ParseNestedMeta;
use syn::parenthesized;
use syn::{Attribute, Expr, Token};

mod doc_attrs;
mod literals;
mod serde_attrs;
mod type_utils;

pub(crate) use doc_attrs::doc_text;
use literals::lit_str;
pub(crate) use serde_attrs::{
    SerdeDefault, SerdeRenameAll, serde_container, serde_field, serde_key,
};
pub(crate) use type_utils::generic_param;

/// Container-level `#[arg_shape(...)]` attributes.
#[derive(Default, Clone)]
pub(crate) struct ContainerAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[arg_shape(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `::argshape::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(ArgShape)]`.
///
/// - `name` replaces the field identifier in flag names and paths.
/// - `help` replaces the doc comment as help text.
/// - `default` supplies a typed default expression.
/// - `fixed` hides the field and freezes it to its default.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub name: Option<String>,
    pub help: Option<String>,
    pub default: Option<Expr>,
    pub fixed: bool,
}

/// Variant-level attributes: the sub-command `name` and its `help`.
#[derive(Default, Clone)]
pub(crate) struct VariantAttrs {
    pub name: Option<String>,
    pub help: Option<String>,
}

/// Iterate all `#[arg_shape(...)]` attributes once and apply a callback.
fn parse_arg_shape<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("arg_shape")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn unknown_key(meta: &ParseNestedMeta, allowed: &str) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| "attribute".to_owned(), ToString::to_string);
    meta.error(format!("unknown arg_shape key `{key}`; expected {allowed}"))
}

/// Extracts `#[arg_shape(...)]` metadata applied to a struct or enum.
pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    parse_arg_shape(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            out.crate_path = Some(path);
            return Ok(());
        }
        Err(unknown_key(meta, "`crate`"))
    })?;
    Ok(out)
}

/// Parses field-level `#[arg_shape(...)]` attributes.
///
/// Unknown keys are rejected so a misspelt `fixed` cannot silently expose a
/// field on the command line.
pub(crate) fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_arg_shape(&field.attrs, |meta| {
        let Some(ident) = meta.path.get_ident() else {
            return discard_unknown(meta);
        };
        match ident.to_string().as_str() {
            "name" => out.name = Some(lit_str(meta, "name")?.value()),
            "help" => out.help = Some(lit_str(meta, "help")?.value()),
            "default" => out.default = Some(meta.value()?.parse()?),
            "fixed" => {
                out.fixed = if meta.input.peek(Token![=]) {
                    meta.value()?.parse::<syn::LitBool>()?.value
                } else {
                    true
                };
            }
            _ => return Err(unknown_key(meta, "`name`, `help`, `default` or `fixed`")),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Parses variant-level `#[arg_shape(...)]` attributes.
pub(crate) fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttrs> {
    let mut out = VariantAttrs::default();
    parse_arg_shape(attrs, |meta| {
        if meta.path.is_ident("name") {
            out.name = Some(lit_str(meta, "name")?.value());
        } else if meta.path.is_ident("help") {
            out.help = Some(lit_str(meta, "help")?.value());
        } else {
            return Err(unknown_key(meta, "`name` or `help`"));
        }
        Ok(())
    })?;
    Ok(out)
}
