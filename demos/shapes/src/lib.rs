//! Drawing description demo for `argshape`.
//!
//! The whole command line is derived from [`cli::ShapesCli`]: nested records
//! become dotted flags, the shape union becomes sub-commands, and defaults
//! are layered from `shapes.toml` and `SHAPES_*` environment variables.

pub mod cli;
pub mod error;
pub mod render;
