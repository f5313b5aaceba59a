//! Error enums for the build, parse and assembly phases.

use thiserror::Error;

/// Failures detected while turning a type description into a parser
/// specification.
///
/// These indicate a mistake in the described type rather than in user input,
/// so they are never rendered as usage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A field's type falls outside the supported shapes.
    #[error("unsupported type at '{path}': {reason}")]
    UnsupportedType {
        /// Dotted path of the offending field.
        path: String,
        /// Why the shape cannot be expressed.
        reason: String,
    },

    /// A record contains itself on the current recursion path.
    #[error("recursive type '{type_name}' at '{path}'")]
    RecursiveType {
        /// Dotted path where the record reappeared.
        path: String,
        /// Name of the repeated record type.
        type_name: String,
    },

    /// A default instance does not fit the declared fields or variants.
    #[error("default value does not match '{path}': {reason}")]
    AmbiguousDefault {
        /// Dotted path of the mismatching field.
        path: String,
        /// Description of the mismatch.
        reason: String,
    },
}

/// Failures raised while rebuilding a value from parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InstantiationError {
    /// A required value was neither parsed nor defaulted.
    #[error("missing value for '{path}'")]
    MissingValue {
        /// Dotted path of the missing field.
        path: String,
    },

    /// No variant was selected for a union without default.
    #[error("no variant selected for '{path}'")]
    MissingVariant {
        /// Dotted path of the union.
        path: String,
    },

    /// The selected sub-command does not name a variant.
    #[error("unknown variant '{variant}' for '{path}'")]
    UnknownVariant {
        /// Dotted path of the union.
        path: String,
        /// Selected sub-command name.
        variant: String,
    },

    /// A record constructor rejected the assembled arguments.
    #[error("invalid value for '{path}': {message}")]
    Constructor {
        /// Path reported by the constructor.
        path: String,
        /// Constructor message.
        message: String,
    },
}

/// Errors returned by the non-exiting entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// The type description could not be turned into a command line.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Error parsing command-line arguments.
    #[error("Failed to parse command-line arguments: {0}")]
    Parse(#[from] Box<clap::Error>),

    /// The parsed arguments could not be turned into a value.
    #[error("Failed to build value from arguments: {0}")]
    Instantiation(#[from] InstantiationError),
}
