//! Summary rendering for parsed drawings.

use std::io::{self, Write};

use crate::cli::{Outline, Shape, ShapesCli};

/// Builds the summary lines describing `drawing`.
#[must_use]
pub fn summary(drawing: &ShapesCli) -> Vec<String> {
    let unit = drawing.units.suffix();
    let background = drawing.canvas.background.as_deref().unwrap_or("transparent");
    vec![
        format!("drawing: {}", drawing.title),
        format!(
            "canvas: {}x{} {unit}, background {background}",
            drawing.canvas.width, drawing.canvas.height
        ),
        format!("shape: {}", describe_shape(&drawing.shape, unit)),
        format!("outline: {}", describe_outline(drawing.outline.as_ref(), unit)),
    ]
}

fn describe_shape(shape: &Shape, unit: &str) -> String {
    match shape {
        Shape::Circle { radius } => format!("circle radius={radius}{unit}"),
        Shape::Rect { width, height } => format!("rect {width}{unit} by {height}{unit}"),
        Shape::Polygon { sides, side } => format!("polygon of {sides} sides, {side}{unit} each"),
    }
}

fn describe_outline(outline: Option<&Outline>, unit: &str) -> String {
    match outline {
        None => "none".to_owned(),
        Some(Outline::Solid { width }) => format!("solid {width}{unit}"),
        Some(Outline::Dashed { width, pattern }) => {
            let dashes: Vec<String> = pattern.iter().map(ToString::to_string).collect();
            format!("dashed {width}{unit} [{}]", dashes.join(" "))
        }
    }
}

/// Writes the summary, followed by `args` when given, one item per line.
///
/// # Errors
///
/// Returns an [`io::Error`] when writing fails.
pub fn write_summary_to(
    out: &mut impl Write,
    drawing: &ShapesCli,
    args: Option<&[String]>,
) -> io::Result<()> {
    for line in summary(drawing) {
        writeln!(out, "{line}")?;
    }
    if let Some(tokens) = args {
        writeln!(out, "args: {}", tokens.join(" "))?;
    }
    Ok(())
}
