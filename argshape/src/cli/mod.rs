//! Entry points tying the builder, the clap bridge and the assembly engine
//! together.

use std::ffi::OsString;
use std::marker::PhantomData;

use clap::{Command, error::ErrorKind};
use heck::ToKebabCase;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::assemble::{assemble, instantiate, to_tokens};
use crate::describe::Describe;
use crate::error::{CliError, SchemaError};
use crate::parser::{collect_matches, render_command};
use crate::spec::{ParserSpecification, SpecBuilder};

/// Builder for parsing a command line into `T`.
///
/// # Examples
///
/// ```
/// use argshape::{ArgShape, ArgShapeCli};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(ArgShape, Serialize, Deserialize, Debug, PartialEq)]
/// struct Point {
///     x: i64,
///     y: Option<String>,
/// }
///
/// let point: Point = ArgShapeCli::new()
///     .prog("point")
///     .try_parse_from(["point", "--x", "3"])?;
/// assert_eq!(point, Point { x: 3, y: None });
/// # Ok::<(), argshape::CliError>(())
/// ```
pub struct ArgShapeCli<T> {
    prog: Option<String>,
    description: Option<String>,
    defaults: Option<Result<Value, SchemaError>>,
    avoid_subparsers: bool,
    target: PhantomData<fn() -> T>,
}

impl<T> Default for ArgShapeCli<T> {
    fn default() -> Self {
        Self {
            prog: None,
            description: None,
            defaults: None,
            avoid_subparsers: false,
            target: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ArgShapeCli<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgShapeCli")
            .field("prog", &self.prog)
            .field("description", &self.description)
            .field("defaults", &self.defaults)
            .field("avoid_subparsers", &self.avoid_subparsers)
            .finish()
    }
}

impl<T: Describe + DeserializeOwned> ArgShapeCli<T> {
    /// Creates a builder with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the program name shown in usage output.
    ///
    /// Defaults to the kebab-case name of the root type.
    #[must_use]
    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = Some(prog.into());
        self
    }

    /// Sets the description shown in help output.
    ///
    /// Defaults to the documentation of the root type.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Uses `instance` as the source of every default.
    ///
    /// Fields the command line leaves out take the instance's values, and
    /// its variants become the default sub-commands.
    #[must_use]
    pub fn default_instance(mut self, instance: &T) -> Self
    where
        T: Serialize,
    {
        self.defaults = Some(serde_json::to_value(instance).map_err(|err| {
            SchemaError::ambiguous_default("", format!("cannot serialize the default instance: {err}"))
        }));
        self
    }

    /// Renders unions that have a default as plain flags of their default
    /// variant instead of sub-commands.
    #[must_use]
    pub const fn avoid_subparsers(mut self, avoid: bool) -> Self {
        self.avoid_subparsers = avoid;
        self
    }

    /// Builds the parser specification for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `T` cannot be expressed as a command line
    /// or the default instance does not fit it.
    pub fn build_spec(&self) -> Result<ParserSpecification, SchemaError> {
        let defaults = match &self.defaults {
            Some(Ok(value)) => Some(value),
            Some(Err(err)) => return Err(err.clone()),
            None => None,
        };
        SpecBuilder::new()
            .avoid_subparsers(self.avoid_subparsers)
            .build(&T::describe(), defaults)
    }

    /// Renders the clap command for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the specification cannot be built.
    pub fn command(&self) -> Result<Command, SchemaError> {
        let spec = self.build_spec()?;
        Ok(self.render(&spec))
    }

    fn render(&self, spec: &ParserSpecification) -> Command {
        let name = self
            .prog
            .clone()
            .unwrap_or_else(|| spec.name.to_kebab_case());
        let cmd = render_command(spec, &name);
        match &self.description {
            Some(description) => cmd.about(description.clone()),
            None => cmd,
        }
    }

    /// Spells `instance` as the arguments that parse back into it.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Schema`] when the specification cannot be built
    /// and [`CliError::Instantiation`] when the serialized instance does not
    /// follow it.
    pub fn to_tokens(&self, instance: &T) -> Result<Vec<String>, CliError>
    where
        T: Serialize,
    {
        let spec = self.build_spec()?;
        let value = serde_json::to_value(instance).map_err(|err| {
            SchemaError::ambiguous_default("", format!("cannot serialize the instance: {err}"))
        })?;
        Ok(to_tokens(&spec, &value)?)
    }

    /// Parses `args` without exiting the process.
    ///
    /// The first item is the program name, as with [`std::env::args_os`].
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Schema`] for a type that cannot be expressed,
    /// [`CliError::Parse`] for malformed arguments, including `--help`
    /// requests, and [`CliError::Instantiation`] when the parsed values do not
    /// construct a `T`.
    pub fn try_parse_from<I, S>(&self, args: I) -> Result<T, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let spec = self.build_spec()?;
        let mut cmd = self.render(&spec);
        run(&spec, &mut cmd, args)
    }

    /// Parses `args`, exiting through clap on malformed input.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `T` cannot be expressed as a command
    /// line. Every other failure prints a usage message and exits.
    pub fn parse_from<I, S>(&self, args: I) -> Result<T, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let spec = self.build_spec()?;
        let mut cmd = self.render(&spec);
        match run(&spec, &mut cmd, args) {
            Ok(value) => Ok(value),
            Err(CliError::Schema(err)) => Err(err),
            Err(CliError::Parse(err)) => err.exit(),
            Err(CliError::Instantiation(err)) => cmd.error(ErrorKind::ValueValidation, err).exit(),
        }
    }

    /// Parses the process arguments, exiting through clap on malformed
    /// input.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when `T` cannot be expressed as a command
    /// line.
    pub fn parse(&self) -> Result<T, SchemaError> {
        self.parse_from(std::env::args_os())
    }
}

fn run<T, I, S>(spec: &ParserSpecification, cmd: &mut Command, args: I) -> Result<T, CliError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = cmd.try_get_matches_from_mut(args)?;
    let parsed = collect_matches(spec, &matches).map_err(|err| err.format(cmd))?;
    debug!(values = parsed.keys().count(), "collected parsed values");
    let assembled = assemble(spec, &parsed)?;
    let unused = assembled.consumed.unused(&parsed);
    if !unused.is_empty() {
        warn!(keys = ?unused, "parsed values were not used");
    }
    Ok(instantiate(assembled.value)?)
}

/// Parses the process arguments into `T` with default settings.
///
/// # Errors
///
/// Returns [`SchemaError`] when `T` cannot be expressed as a command line.
pub fn cli<T: Describe + DeserializeOwned>() -> Result<T, SchemaError> {
    ArgShapeCli::<T>::new().parse()
}

/// DEPRECATED: parses the process arguments into `T`.
///
/// # Errors
///
/// Returns [`SchemaError`] when `T` cannot be expressed as a command line.
#[deprecated(since = "0.2.0", note = "Use `argshape::cli` instead")]
pub fn parse<T: Describe + DeserializeOwned>() -> Result<T, SchemaError> {
    cli()
}
