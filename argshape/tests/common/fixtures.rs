//! Record and union types used across the integration tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use argshape::ArgShape;
use serde::{Deserialize, Serialize};

/// A point on the plane.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: i64,
    /// Optional label.
    pub y: Option<String>,
}

/// Shapes the renderer knows.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub enum Shape {
    /// A circle of radius `r`.
    Circle {
        /// Radius.
        r: f64,
    },
    /// A square of side `s`.
    Square {
        /// Side length.
        s: f64,
    },
}

/// Drawing output formats.
#[derive(Debug, Clone, Copy, ArgShape, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Scalable vector graphics.
    Svg,
    /// Portable network graphics.
    Png,
}

/// Stroke settings.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub struct Stroke {
    /// Line width in pixels.
    #[arg_shape(default = 1)]
    pub width: u16,
    /// Dash pattern.
    #[arg_shape(default = Vec::new())]
    pub dashes: Vec<u8>,
}

/// Draw a shape.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub struct Draw {
    /// Output file.
    pub output: PathBuf,
    /// Output format.
    #[arg_shape(default = Format::Svg)]
    pub format: Format,
    /// Stroke settings.
    pub stroke: Stroke,
    /// Shape to draw.
    pub shape: Shape,
}

/// Every leaf shape the command line can carry.
#[derive(Debug, Clone, ArgShape, Serialize, Deserialize, PartialEq)]
pub struct Leaves {
    pub flag: bool,
    pub letter: char,
    pub count: u32,
    pub offset: i8,
    pub ratio: f32,
    pub name: String,
    pub path: PathBuf,
    pub format: Format,
    pub note: Option<String>,
    pub sizes: Vec<u16>,
    pub tags: BTreeSet<String>,
    pub corner: (i32, i32),
    pub pair: [u8; 2],
    pub weights: BTreeMap<String, f64>,
    pub maybe_sizes: Option<Vec<u8>>,
}
