//! Core crate for the `argshape` command-line derivation framework.
//!
//! A type describes its own shape through [`Describe`], usually generated by
//! `#[derive(ArgShape)]`. The runtime then walks that description, renders a
//! `clap` command with one flag per leaf field and one sub-command layer per
//! union, and rebuilds the typed value from whatever the user passed.
//!
//! ```rust,no_run
//! use argshape::ArgShape;
//! use serde::{Deserialize, Serialize};
//!
//! /// Train a model.
//! #[derive(ArgShape, Serialize, Deserialize)]
//! struct Train {
//!     /// Number of epochs.
//!     epochs: u32,
//!     /// Optional run label.
//!     label: Option<String>,
//! }
//!
//! # fn main() -> Result<(), argshape::SchemaError> {
//! let args: Train = argshape::cli()?;
//! # let _ = args;
//! # Ok(())
//! # }
//! ```

extern crate self as argshape;

pub use argshape_macros::ArgShape;

pub mod assemble;
mod cli;
pub mod defaults;
mod describe;
mod error;
pub mod parser;
pub mod shape;
pub mod spec;

pub use assemble::{Assembled, ConsumedKeys, assemble, instantiate};
pub use cli::parse;
pub use cli::{ArgShapeCli, cli};
pub use defaults::{DefaultsError, DefaultsSource};
pub use describe::{
    Describe, FieldDefault, FieldSchema, LiteralSet, Record, RecordRef, RecordSchema, ScalarKind,
    TypeDesc, UnionDesc, VariantDesc,
};
pub use error::{CliError, InstantiationError, SchemaError, is_display_request};
pub use parser::ParsedValues;
pub use shape::{Decomposed, TypeShape, decompose};
pub use spec::{ArgumentSpec, ChildSpec, ParserSpecification, SpecBuilder};
