//! Constructors for the error enums.

use super::{CliError, InstantiationError, SchemaError};

/// Renders an empty path as the root marker.
fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_owned()
    } else {
        path.to_owned()
    }
}

impl SchemaError {
    /// Construct an [`SchemaError::UnsupportedType`].
    ///
    /// # Examples
    ///
    /// ```
    /// use argshape::SchemaError;
    /// let err = SchemaError::unsupported("opt.items", "sets of records");
    /// assert_eq!(err.to_string(), "unsupported type at 'opt.items': sets of records");
    /// ```
    #[must_use]
    pub fn unsupported(path: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            path: display_path(path),
            reason: reason.into(),
        }
    }

    /// Construct an [`SchemaError::RecursiveType`].
    #[must_use]
    pub fn recursive(path: &str, type_name: &str) -> Self {
        Self::RecursiveType {
            path: display_path(path),
            type_name: type_name.to_owned(),
        }
    }

    /// Construct an [`SchemaError::AmbiguousDefault`].
    #[must_use]
    pub fn ambiguous_default(path: &str, reason: impl Into<String>) -> Self {
        Self::AmbiguousDefault {
            path: display_path(path),
            reason: reason.into(),
        }
    }
}

impl InstantiationError {
    /// Construct an [`InstantiationError::MissingValue`].
    #[must_use]
    pub fn missing(path: &str) -> Self {
        Self::MissingValue {
            path: display_path(path),
        }
    }

    /// Construct an [`InstantiationError::MissingVariant`].
    #[must_use]
    pub fn missing_variant(path: &str) -> Self {
        Self::MissingVariant {
            path: display_path(path),
        }
    }

    /// Construct an [`InstantiationError::UnknownVariant`].
    #[must_use]
    pub fn unknown_variant(path: &str, variant: &str) -> Self {
        Self::UnknownVariant {
            path: display_path(path),
            variant: variant.to_owned(),
        }
    }

    /// Construct an [`InstantiationError::Constructor`] from a deserialization
    /// failure.
    ///
    /// serde reports the root path as `.`, which is shown as `<root>`.
    #[must_use]
    pub fn constructor(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let raw_path = error.path().to_string();
        let path = if raw_path == "." { "" } else { raw_path.as_str() };
        Self::Constructor {
            path: display_path(path),
            message: error.into_inner().to_string(),
        }
    }
}

impl From<clap::Error> for CliError {
    fn from(error: clap::Error) -> Self {
        Self::Parse(Box::new(error))
    }
}

impl CliError {
    /// Returns the clap error when parsing failed.
    #[must_use]
    pub fn as_parse_error(&self) -> Option<&clap::Error> {
        match self {
            Self::Parse(error) => Some(error),
            _ => None,
        }
    }
}
