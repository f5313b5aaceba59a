//! Shapes demo entry-point: load defaults, parse arguments, print a summary.

use std::io;

use argshape::{ArgShapeCli, CliError, is_display_request};
use tracing_subscriber::EnvFilter;

use shapes::cli::{ShapesCli, command_line, load_defaults};
use shapes::error::{Result, ShapesError};
use shapes::render::write_summary_to;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    run().map_err(color_eyre::eyre::Report::from)
}

fn run() -> Result<()> {
    let defaults = load_defaults(&std::env::current_dir()?)?;
    let cli = command_line(&defaults);
    let drawing = parse_command_line(&cli)?;
    let args = if drawing.echo_args {
        Some(cli.to_tokens(&drawing)?)
    } else {
        None
    };
    let mut stdout = io::stdout().lock();
    write_summary_to(&mut stdout, &drawing, args.as_deref())?;
    Ok(())
}

fn parse_command_line(cli: &ArgShapeCli<ShapesCli>) -> Result<ShapesCli> {
    match cli.try_parse_from(std::env::args_os()) {
        Ok(drawing) => Ok(drawing),
        Err(CliError::Parse(err)) if is_display_request(&err) => err.exit(),
        Err(err) => Err(ShapesError::Arguments(err)),
    }
}
