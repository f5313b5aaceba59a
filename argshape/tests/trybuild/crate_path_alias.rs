use argshape::{ArgShape, ArgShapeCli};
use serde::{Deserialize, Serialize};

/// Verifies that `#[arg_shape(crate = "argshape")]` is accepted and the
/// generated code compiles correctly.
#[derive(Debug, Serialize, Deserialize, ArgShape)]
#[arg_shape(crate = "argshape")]
struct CratePathArgs {
    value: String,
    #[arg_shape(default = 1)]
    count: u32,
}

fn main() {
    let result = ArgShapeCli::<CratePathArgs>::new().try_parse_from(["prog", "--value", "x"]);
    let _: Result<CratePathArgs, argshape::CliError> = result;
}
