use argshape::ArgShape;
use serde::Deserialize;

#[derive(Deserialize, ArgShape)]
#[serde(tag = "kind")]
enum Tagged {
    Circle { r: f64 },
    Square { s: f64 },
}

fn main() {}
