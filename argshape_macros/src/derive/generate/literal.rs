//! Unit-only enums become literal choices of their serde names.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DataEnum;
use syn::ext::IdentExt;

use super::Context;
use crate::derive::parse::{serde_field, serde_key};

pub(in crate::derive) fn expand(ctx: &Context<'_>, data: &DataEnum) -> syn::Result<TokenStream> {
    let krate = &ctx.krate;
    let ident = ctx.ident;
    let mut tags = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let serde = serde_field(&variant.attrs)?;
        if serde.skip {
            continue;
        }
        let name = variant.ident.unraw().to_string();
        tags.push(serde_key(&name, &serde, ctx.rename_all));
    }
    let (impl_generics, ty_generics, where_clause) = ctx.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #krate::Describe for #ident #ty_generics #where_clause {
            fn describe() -> #krate::TypeDesc {
                #krate::TypeDesc::Literal(#krate::LiteralSet::strings(&[#(#tags),*]))
            }
        }
    })
}
