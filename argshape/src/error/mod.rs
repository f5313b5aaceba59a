//! Error types produced while building, parsing and assembling a command line.

mod constructors;
mod helpers;
mod types;

pub use helpers::is_display_request;
pub use types::{CliError, InstantiationError, SchemaError};
