//! Expansion of `#[derive(ArgShape)]`.

use proc_macro2::TokenStream;
use syn::{Data, DeriveInput, Fields};

mod crate_path;
mod generate;
mod parse;

use generate::Context;

/// Expands the derive for a struct or enum.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = parse::parse_container_attrs(&input.attrs)?;
    let serde = parse::serde_container(&input.attrs)?;
    let krate = crate_path::resolve(container.crate_path.as_ref());
    let ctx = Context::new(input, krate, serde.rename_all);
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => generate::record::expand(&ctx, &named.named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "ArgShape requires a struct with named fields",
            )),
        },
        Data::Enum(data) => {
            if serde.non_external_tagging {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "ArgShape supports externally tagged enums only; remove `tag`, `content` or `untagged`",
                ));
            }
            if data.variants.is_empty() {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "ArgShape requires at least one variant",
                ));
            }
            if data
                .variants
                .iter()
                .all(|variant| matches!(variant.fields, Fields::Unit))
            {
                generate::literal::expand(&ctx, data)
            } else {
                generate::union::expand(&ctx, data)
            }
        }
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "ArgShape cannot be derived for unions",
        )),
    }
}
