//! `Describe` and `Record` implementations for structs.

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Field, Token};

use super::Context;

pub(in crate::derive) fn expand(
    ctx: &Context<'_>,
    fields: &Punctuated<Field, Token![,]>,
) -> syn::Result<TokenStream> {
    let krate = &ctx.krate;
    let ident = ctx.ident;
    let schema = ctx.record_schema(
        &ident.to_string(),
        ctx.description.as_deref(),
        fields,
        ctx.rename_all,
    )?;
    let (impl_generics, ty_generics, where_clause) = ctx.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #krate::Describe for #ident #ty_generics #where_clause {
            fn describe() -> #krate::TypeDesc {
                #krate::TypeDesc::Record(#krate::RecordRef::of::<Self>())
            }
        }

        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn record_schema() -> #krate::RecordSchema {
                #schema
            }
        }
    })
}
