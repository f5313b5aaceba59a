//! Token converters for leaf shapes.
//!
//! Converters return a plain message on failure; the caller wraps it in the
//! clap error kind that fits where the conversion ran.

use serde_json::{Map, Number, Value};

use crate::describe::{LiteralSet, ScalarKind, literal_token};
use crate::shape::TypeShape;

/// Converts one token into the value of a scalar or literal shape.
pub(crate) fn convert_leaf(shape: &TypeShape, token: &str) -> Result<Value, String> {
    match shape {
        TypeShape::Scalar(kind) => convert_scalar(*kind, token),
        TypeShape::Literal(set) => convert_literal(set, token),
        TypeShape::Optional(inner) => convert_leaf(inner, token),
        _ => Err("a single token cannot carry this value".to_owned()),
    }
}

/// Converts one token into a scalar value.
pub(crate) fn convert_scalar(kind: ScalarKind, token: &str) -> Result<Value, String> {
    match kind {
        ScalarKind::Bool => match token.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("expected 'true' or 'false'".to_owned()),
        },
        ScalarKind::Char => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(single), None) => Ok(Value::String(single.to_string())),
                _ => Err("expected exactly one character".to_owned()),
            }
        }
        ScalarKind::Str | ScalarKind::Path => Ok(Value::String(token.to_owned())),
        ScalarKind::Int { bits, signed } => convert_int(token, bits, signed),
        ScalarKind::Float { bits } => convert_float(token, bits),
    }
}

fn int_bounds(bits: u8, signed: bool) -> (i128, i128) {
    let width = u32::from(bits.clamp(1, 64));
    if signed {
        let half = 1_i128 << (width - 1);
        (-half, half - 1)
    } else {
        (0, (1_i128 << width) - 1)
    }
}

fn convert_int(token: &str, bits: u8, signed: bool) -> Result<Value, String> {
    let parsed: i128 = token
        .parse()
        .map_err(|_| format!("'{token}' is not an integer"))?;
    let (min, max) = int_bounds(bits, signed);
    if parsed < min || parsed > max {
        return Err(format!("{parsed} is outside the range {min}..={max}"));
    }
    if let Ok(unsigned) = u64::try_from(parsed) {
        return Ok(Value::from(unsigned));
    }
    i64::try_from(parsed)
        .map(Value::from)
        .map_err(|_| format!("{parsed} does not fit in 64 bits"))
}

fn convert_float(token: &str, bits: u8) -> Result<Value, String> {
    let parsed: f64 = token
        .parse()
        .map_err(|_| format!("'{token}' is not a number"))?;
    if bits == 32 && parsed.is_finite() && parsed.abs() > f64::from(f32::MAX) {
        return Err(format!("{parsed} does not fit in a 32-bit float"));
    }
    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| format!("'{token}' is not a finite number"))
}

/// Finds the literal spelled `token`.
pub(crate) fn convert_literal(set: &LiteralSet, token: &str) -> Result<Value, String> {
    set.find(token).cloned().ok_or_else(|| {
        let choices: Vec<String> = set.tokens().collect();
        format!("expected one of {}", choices.join(", "))
    })
}

/// Converts the tokens of a fixed tuple position by position.
pub(crate) fn convert_tuple(items: &[TypeShape], tokens: &[String]) -> Result<Value, String> {
    if items.len() != tokens.len() {
        return Err(format!(
            "expected {} values, found {}",
            items.len(),
            tokens.len()
        ));
    }
    items
        .iter()
        .zip(tokens)
        .map(|(item, token)| convert_leaf(item, token))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Converts alternating key and value tokens into a mapping.
pub(crate) fn convert_mapping(
    key: &TypeShape,
    value: &TypeShape,
    tokens: &[String],
) -> Result<Value, String> {
    let mut pairs = tokens.chunks_exact(2);
    let mut entries = Map::new();
    for pair in pairs.by_ref() {
        let [raw_key, raw_value] = pair else {
            continue;
        };
        let converted_key = convert_leaf(key, raw_key)?;
        let converted_value = convert_leaf(value, raw_value)?;
        entries.insert(literal_token(&converted_key), converted_value);
    }
    if !pairs.remainder().is_empty() {
        return Err("expected key and value pairs".to_owned());
    }
    Ok(Value::Object(entries))
}
