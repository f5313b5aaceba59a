//! Trybuild fixture verifying `#[arg_shape(crate = "...")]` works with a
//! genuine dependency rename via `use ... as`.

use argshape as my_args;
use my_args::{ArgShape, ArgShapeCli};
use serde::{Deserialize, Serialize};

/// Verifies that `#[arg_shape(crate = "my_args")]` generates code that
/// references types through the aliased name.
#[derive(Debug, Serialize, Deserialize, ArgShape)]
#[arg_shape(crate = "my_args")]
enum AliasedCommand {
    /// Start the service.
    Start { port: u16 },
    Stop,
}

fn main() {
    let result = ArgShapeCli::<AliasedCommand>::new().try_parse_from(["prog", "stop"]);
    let _: Result<AliasedCommand, my_args::CliError> = result;
}
