//! Procedural macros for `argshape`.
//!
//! `#[derive(ArgShape)]` emits the static description of a struct or enum so
//! the runtime can render it as a command line:
//!
//! - structs with named fields become records, one flag per leaf field;
//! - enums whose variants are all unit variants become literal choices;
//! - any other enum becomes a union, one sub-command per variant.
//!
//! Flag and key names follow serde's `rename`/`rename_all` attributes so the
//! assembled value deserializes back into the annotated type.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `argshape::Describe` (and `argshape::Record` on structs).
///
/// Recognised attributes:
///
/// - container `#[arg_shape(crate = "path")]` when `argshape` is renamed;
/// - field `#[arg_shape(default = expr)]`, `#[arg_shape(fixed)]`,
///   `#[arg_shape(name = "...")]`, `#[arg_shape(help = "...")]`;
/// - variant `#[arg_shape(name = "...")]`, `#[arg_shape(help = "...")]`.
///
/// Doc comments supply help text when no `help` is given.
#[proc_macro_derive(ArgShape, attributes(arg_shape))]
pub fn derive_arg_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
