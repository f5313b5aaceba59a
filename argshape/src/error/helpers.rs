//! Helpers for classifying and routing external errors.

use clap::{Error as ClapError, error::ErrorKind};

/// Tells a `--help` or `--version` request apart from a real parse failure.
///
/// [`ArgShapeCli::try_parse_from`](crate::ArgShapeCli::try_parse_from)
/// reports both as [`CliError::Parse`](crate::CliError::Parse); callers
/// usually let clap print the former and exit with status zero.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}
