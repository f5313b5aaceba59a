//! Enums with payloads become unions of records.
//!
//! Struct variants get a hidden schema function on the enum so their fields
//! resolve lazily, like any other record.

use heck::{ToKebabCase, ToSnakeCase};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DataEnum, Fields, Variant};

use super::Context;
use crate::derive::parse::{doc_text, parse_variant_attrs, serde_field, serde_key};

pub(in crate::derive) fn expand(ctx: &Context<'_>, data: &DataEnum) -> syn::Result<TokenStream> {
    let krate = &ctx.krate;
    let ident = ctx.ident;
    let mut variants = Vec::with_capacity(data.variants.len());
    let mut helpers = Vec::new();
    for variant in &data.variants {
        if let Some(tokens) = variant_desc(ctx, variant, &mut helpers)? {
            variants.push(tokens);
        }
    }
    let mut union = quote! { #krate::UnionDesc::new(::std::any::type_name::<Self>()) };
    if let Some(description) = &ctx.description {
        union = quote! { #union.with_description(#description) };
    }
    let (impl_generics, ty_generics, where_clause) = ctx.generics.split_for_impl();
    let helper_impl = if helpers.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            impl #impl_generics #ident #ty_generics #where_clause {
                #(#helpers)*
            }
        }
    };
    Ok(quote! {
        impl #impl_generics #krate::Describe for #ident #ty_generics #where_clause {
            fn describe() -> #krate::TypeDesc {
                #krate::TypeDesc::Union(#union #(.variant(#variants))*)
            }
        }

        #helper_impl
    })
}

fn variant_desc(
    ctx: &Context<'_>,
    variant: &Variant,
    helpers: &mut Vec<TokenStream>,
) -> syn::Result<Option<TokenStream>> {
    let krate = &ctx.krate;
    let serde = serde_field(&variant.attrs)?;
    if serde.skip {
        return Ok(None);
    }
    let attrs = parse_variant_attrs(&variant.attrs)?;
    let ident_str = variant.ident.unraw().to_string();
    let name = attrs.name.unwrap_or_else(|| ident_str.to_kebab_case());
    let tag = serde_key(&ident_str, &serde, ctx.rename_all);
    let help = attrs.help.or_else(|| doc_text(&variant.attrs));

    let mut tokens = match &variant.fields {
        Fields::Unit => quote! { #krate::VariantDesc::unit(#name, #tag) },
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            let payload = fields
                .unnamed
                .first()
                .map(|field| ctx.type_desc(&field.ty))
                .unwrap_or_default();
            quote! { #krate::VariantDesc::record(#name, #tag, #payload) }
        }
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "tuple variants must wrap exactly one record",
            ));
        }
        Fields::Named(fields) => {
            let helper = format_ident!("__arg_shape_variant_{}", ident_str.to_snake_case());
            let schema =
                ctx.record_schema(&ident_str, help.as_deref(), &fields.named, serde.rename_all)?;
            helpers.push(quote! {
                #[doc(hidden)]
                fn #helper() -> #krate::RecordSchema {
                    #schema
                }
            });
            quote! {
                #krate::VariantDesc::record(
                    #name,
                    #tag,
                    #krate::TypeDesc::Record(#krate::RecordRef::new(
                        ::std::borrow::Cow::Owned(::std::format!(
                            "{}::{}",
                            ::std::any::type_name::<Self>(),
                            #ident_str,
                        )),
                        Self::#helper,
                    )),
                )
            }
        }
    };
    if let Some(help) = help {
        tokens = quote! { #tokens.with_help(#help) };
    }
    Ok(Some(tokens))
}
