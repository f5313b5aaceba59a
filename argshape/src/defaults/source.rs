//! Layered default instances gathered from configuration files and the
//! environment.

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors raised while gathering a default instance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DefaultsError {
    /// The layered sources could not be merged into the requested type.
    #[error("Failed to gather defaults: {0}")]
    Gathering(#[from] Box<figment::Error>),
}

impl From<figment::Error> for DefaultsError {
    fn from(error: figment::Error) -> Self {
        Self::Gathering(Box::new(error))
    }
}

/// Builds a default instance from layered sources.
///
/// Later layers override earlier ones. The extracted value is meant to be
/// passed to [`crate::ArgShapeCli::default_instance`], so command-line flags
/// override whatever the files and environment provide.
///
/// # Examples
///
/// ```rust,no_run
/// use argshape::DefaultsSource;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Train {
///     epochs: u32,
/// }
///
/// let defaults: Train = DefaultsSource::new()
///     .toml_file("train.toml")
///     .env_prefixed("TRAIN_")
///     .extract()?;
/// # let _ = defaults;
/// # Ok::<(), argshape::DefaultsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultsSource {
    figment: Figment,
}

impl DefaultsSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing figment.
    #[must_use]
    pub const fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    /// Seeds the layers with a serialized value.
    #[must_use]
    pub fn value<T: Serialize>(self, value: &T) -> Self {
        Self {
            figment: self.figment.merge(Serialized::defaults(value)),
        }
    }

    /// Merges a TOML file; a missing file contributes nothing.
    #[must_use]
    pub fn toml_file(self, path: impl AsRef<Path>) -> Self {
        Self {
            figment: self.figment.merge(Toml::file(path.as_ref())),
        }
    }

    /// Merges environment variables starting with `prefix`.
    ///
    /// Nested fields are addressed with a double underscore, so
    /// `TRAIN_OPTIMIZER__LR` sets `optimizer.lr`.
    #[must_use]
    pub fn env_prefixed(self, prefix: &str) -> Self {
        Self {
            figment: self.figment.merge(Env::prefixed(prefix).split("__")),
        }
    }

    /// Extracts the merged value.
    ///
    /// # Errors
    ///
    /// Returns [`DefaultsError::Gathering`] when a layer fails to parse or the
    /// merged data does not deserialize into `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, DefaultsError> {
        Ok(self.figment.extract()?)
    }
}
