//! Error types for the `shapes` demo.

use thiserror::Error;

/// Errors raised by the shapes demo.
#[derive(Debug, Error)]
pub enum ShapesError {
    /// The layered defaults could not be loaded.
    #[error("failed to load defaults: {0}")]
    Defaults(#[from] argshape::DefaultsError),
    /// The command-line type could not be turned into a parser.
    #[error(transparent)]
    Schema(#[from] argshape::SchemaError),
    /// The command line was malformed or did not describe a drawing.
    #[error("invalid arguments: {0}")]
    Arguments(argshape::CliError),
    /// The drawing could not be spelled back as arguments.
    #[error("failed to render arguments: {0}")]
    Tokens(#[from] argshape::CliError),
    /// Writing the summary failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for the demo.
pub type Result<T> = std::result::Result<T, ShapesError>;
