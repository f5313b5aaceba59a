//! Command-line types for the shapes demo.

use std::path::Path;

use argshape::{ArgShape, ArgShapeCli, DefaultsSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Prefix of environment variables that override defaults.
pub const ENV_PREFIX: &str = "SHAPES_";

/// File in the working directory that overrides defaults.
pub const CONFIG_FILE: &str = "shapes.toml";

/// Describe a drawing and print a summary of it.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub struct ShapesCli {
    /// Name of the drawing.
    pub title: String,
    /// Units used for every length.
    pub units: Units,
    /// Canvas settings.
    pub canvas: Canvas,
    /// Shape to draw.
    pub shape: Shape,
    /// Outline drawn around the shape.
    pub outline: Option<Outline>,
    /// Print the arguments that reproduce this drawing.
    #[serde(default)]
    pub echo_args: bool,
    /// Version of the summary layout.
    #[arg_shape(fixed, default = 1)]
    pub layout_version: u8,
}

impl Default for ShapesCli {
    fn default() -> Self {
        Self {
            title: "untitled".to_owned(),
            units: Units::Px,
            canvas: Canvas::default(),
            shape: Shape::Circle { radius: 1.0 },
            outline: None,
            echo_args: false,
            layout_version: 1,
        }
    }
}

/// Length units.
#[derive(Debug, Clone, Copy, ArgShape, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Pixels.
    Px,
    /// Millimetres.
    Mm,
}

impl Units {
    /// Suffix printed after lengths.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Mm => "mm",
        }
    }
}

/// Canvas settings.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub struct Canvas {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Background colour; transparent when unset.
    pub background: Option<String>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            background: None,
        }
    }
}

/// Shapes the demo can describe.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A circle.
    Circle {
        /// Radius.
        radius: f64,
    },
    /// An axis-aligned rectangle.
    Rect {
        /// Horizontal extent.
        width: f64,
        /// Vertical extent.
        height: f64,
    },
    /// A regular polygon.
    Polygon {
        /// Number of sides.
        sides: u8,
        /// Length of one side.
        side: f64,
    },
}

/// Outline styles.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub enum Outline {
    /// A continuous line.
    Solid {
        /// Line width.
        width: f64,
    },
    /// A dashed line.
    Dashed {
        /// Line width.
        width: f64,
        /// Alternating dash and gap lengths.
        pattern: Vec<u8>,
    },
}

/// Loads the default drawing from built-in values, `shapes.toml` in `dir`
/// and `SHAPES_*` environment variables, in that order.
///
/// # Errors
///
/// Returns [`crate::error::ShapesError::Defaults`] when a layer fails to
/// parse or the merged values do not form a drawing.
pub fn load_defaults(dir: &Path) -> Result<ShapesCli> {
    let config = dir.join(CONFIG_FILE);
    debug!(path = %config.display(), "loading defaults");
    Ok(DefaultsSource::new()
        .value(&ShapesCli::default())
        .toml_file(config)
        .env_prefixed(ENV_PREFIX)
        .extract()?)
}

/// Builds the command-line parser seeded with `defaults`.
#[must_use]
pub fn command_line(defaults: &ShapesCli) -> ArgShapeCli<ShapesCli> {
    ArgShapeCli::new().prog("shapes").default_instance(defaults)
}
