//! Token generation shared by records, unions and literal enums.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{DeriveInput, Field, Generics, Ident, Token, Type, parse_quote};

use super::parse::{
    SerdeDefault, SerdeRenameAll, doc_text, generic_param, parse_field_attrs, serde_field,
    serde_key,
};

pub(super) mod literal;
pub(super) mod record;
pub(super) mod union;

/// Everything generation needs to know about the annotated item.
pub(super) struct Context<'a> {
    pub ident: &'a Ident,
    /// Item generics with a `Describe` bound on every type parameter.
    pub generics: Generics,
    pub type_params: Vec<Ident>,
    pub krate: TokenStream,
    pub rename_all: Option<SerdeRenameAll>,
    pub description: Option<String>,
}

impl<'a> Context<'a> {
    pub(super) fn new(
        input: &'a DeriveInput,
        krate: TokenStream,
        rename_all: Option<SerdeRenameAll>,
    ) -> Self {
        let type_params: Vec<Ident> = input
            .generics
            .type_params()
            .map(|param| param.ident.clone())
            .collect();
        let mut generics = input.generics.clone();
        let where_clause = generics.make_where_clause();
        for param in &type_params {
            where_clause
                .predicates
                .push(parse_quote!(#param: #krate::Describe));
        }
        Self {
            ident: &input.ident,
            generics,
            type_params,
            krate,
            rename_all,
            description: doc_text(&input.attrs),
        }
    }

    /// Describes `ty`, marking a bare generic parameter as a type variable.
    pub(super) fn type_desc(&self, ty: &Type) -> TokenStream {
        let krate = &self.krate;
        match generic_param(ty, &self.type_params) {
            Some(param) => {
                let name = param.to_string();
                quote! {
                    #krate::TypeDesc::type_var(#name, <#ty as #krate::Describe>::describe())
                }
            }
            None => quote! { <#ty as #krate::Describe>::describe() },
        }
    }

    /// Builds the `RecordSchema` expression for a list of named fields.
    ///
    /// `rename_all` applies to the field keys. Enum-level rules do not reach
    /// the fields of struct variants; those take the variant's own rule.
    pub(super) fn record_schema(
        &self,
        name: &str,
        description: Option<&str>,
        fields: &Punctuated<Field, Token![,]>,
        rename_all: Option<SerdeRenameAll>,
    ) -> syn::Result<TokenStream> {
        let krate = &self.krate;
        let mut schema = quote! { #krate::RecordSchema::new(#name) };
        if let Some(description) = description {
            schema = quote! { #schema.with_description(#description) };
        }
        for field in fields {
            if let Some(tokens) = self.field_schema(field, rename_all)? {
                schema = quote! { #schema.field(#tokens) };
            }
        }
        Ok(schema)
    }

    fn field_schema(
        &self,
        field: &Field,
        rename_all: Option<SerdeRenameAll>,
    ) -> syn::Result<Option<TokenStream>> {
        let krate = &self.krate;
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "unnamed fields are not supported"));
        };
        let attrs = parse_field_attrs(field)?;
        let serde = serde_field(&field.attrs)?;
        if serde.skip {
            return Ok(None);
        }
        if serde.flatten {
            return Err(syn::Error::new_spanned(
                field,
                "`#[serde(flatten)]` is not supported; nest the record as a field instead",
            ));
        }
        let ident_str = ident.unraw().to_string();
        let name = attrs.name.unwrap_or_else(|| ident_str.clone());
        let key = serde_key(&ident_str, &serde, rename_all);
        let ty = &field.ty;
        let desc = self.type_desc(ty);

        let mut tokens = quote! { #krate::FieldSchema::new(#name, #key, #desc) };
        if let Some(help) = attrs.help.or_else(|| doc_text(&field.attrs)) {
            tokens = quote! { #tokens.with_help(#help) };
        }
        let default = match (&attrs.default, &serde.default) {
            (Some(expr), _) => Some(quote! { { let value: #ty = #expr; value } }),
            (None, Some(SerdeDefault::Trait)) => {
                Some(quote! { <#ty as ::core::default::Default>::default() })
            }
            (None, Some(SerdeDefault::Path(path))) => {
                Some(quote! { { let value: #ty = #path(); value } })
            }
            (None, None) => None,
        };
        if let Some(default) = default {
            tokens = quote! { #tokens.with_default(&#default) };
        }
        if attrs.fixed {
            tokens = quote! { #tokens.fixed() };
        }
        Ok(Some(tokens))
    }
}
