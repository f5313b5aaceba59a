//! Assembly engine rebuilding nested values from flat parse results.
//!
//! The walk mirrors the specification tree: children are assembled first,
//! then the record of the current level is completed with its own leaf
//! values. Unions contribute only their selected variant, wrapped the way
//! serde expects an externally tagged enum. The finished [`Value`] is handed
//! to serde, which runs the record constructors.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::InstantiationError;
use crate::parser::ParsedValues;
use crate::spec::{ArgumentSpec, ChildSpec, ParserSpecification, UnionSpec};

mod tokens;

pub use tokens::{disassemble, render_tokens, to_tokens};

/// Dotted keys and union paths read while assembling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumedKeys {
    values: BTreeSet<String>,
    selections: BTreeSet<String>,
}

impl ConsumedKeys {
    /// Returns `true` when the value at `path` was read.
    #[must_use]
    pub fn contains_value(&self, path: &str) -> bool {
        self.values.contains(path)
    }

    /// Returns `true` when the selection of the union at `path` was read.
    #[must_use]
    pub fn contains_selection(&self, path: &str) -> bool {
        self.selections.contains(path)
    }

    /// Iterates over the consumed value paths.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Lists the parsed keys and selections that were never read.
    #[must_use]
    pub fn unused<'a>(&self, parsed: &'a ParsedValues) -> Vec<&'a str> {
        parsed
            .keys()
            .filter(|key| !self.values.contains(*key))
            .chain(
                parsed
                    .selected_unions()
                    .filter(|key| !self.selections.contains(*key)),
            )
            .collect()
    }
}

/// Output of [`assemble`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    /// The rebuilt value, shaped like the serialized form of the target type.
    pub value: Value,
    /// Keys read from the parse result.
    pub consumed: ConsumedKeys,
}

/// Rebuilds the nested value described by `spec` from `parsed`.
///
/// Parsed values win over defaults, fixed fields always take their default,
/// and a union without selection falls back to its default variant.
///
/// # Errors
///
/// Returns an [`InstantiationError`] when a required value or union selection
/// is missing, or when a selection names no variant.
///
/// # Examples
///
/// ```
/// use argshape::{ArgShape, ParsedValues, SpecBuilder, assemble, Describe};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(ArgShape, Deserialize)]
/// struct Point {
///     x: i64,
///     #[arg_shape(default = 0)]
///     y: i64,
/// }
///
/// let spec = SpecBuilder::new().build(&Point::describe(), None)?;
/// let mut parsed = ParsedValues::new();
/// parsed.insert("x", json!(4));
/// let assembled = assemble(&spec, &parsed)?;
/// assert_eq!(assembled.value, json!({ "x": 4, "y": 0 }));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn assemble(
    spec: &ParserSpecification,
    parsed: &ParsedValues,
) -> Result<Assembled, InstantiationError> {
    let mut consumed = ConsumedKeys::default();
    let value = if spec.passthrough {
        match spec.children.first() {
            Some(ChildSpec::Union(union)) => assemble_union(union, parsed, &mut consumed)?,
            Some(ChildSpec::PinnedVariant { tag, node, .. }) => {
                tag.wrap(assemble_node(node, parsed, &mut consumed)?)
            }
            _ => return Err(InstantiationError::missing_variant("")),
        }
    } else {
        assemble_node(spec, parsed, &mut consumed)?
    };
    debug!(
        values = consumed.values.len(),
        selections = consumed.selections.len(),
        "assembled value"
    );
    Ok(Assembled { value, consumed })
}

fn assemble_node(
    node: &ParserSpecification,
    parsed: &ParsedValues,
    consumed: &mut ConsumedKeys,
) -> Result<Value, InstantiationError> {
    let mut record = Map::new();
    for child in &node.children {
        match child {
            ChildSpec::Group { key, node: group } => {
                let value = assemble_node(group, parsed, consumed)?;
                record.insert(key.clone(), value);
            }
            ChildSpec::Union(union) => {
                let value = assemble_union(union, parsed, consumed)?;
                record.insert(union.key.clone(), value);
            }
            ChildSpec::PinnedVariant { key, tag, node: pinned } => {
                let payload = assemble_node(pinned, parsed, consumed)?;
                record.insert(key.clone(), tag.wrap(payload));
            }
        }
    }
    for argument in &node.arguments {
        let value = leaf_value(argument, parsed, consumed)?;
        record.insert(argument.key.clone(), value);
    }
    Ok(Value::Object(record))
}

fn leaf_value(
    argument: &ArgumentSpec,
    parsed: &ParsedValues,
    consumed: &mut ConsumedKeys,
) -> Result<Value, InstantiationError> {
    if !argument.fixed
        && let Some(value) = parsed.value(&argument.path)
    {
        consumed.values.insert(argument.path.clone());
        trace!(path = %argument.path, "using parsed value");
        return Ok(value.clone());
    }
    argument
        .default
        .clone()
        .ok_or_else(|| InstantiationError::missing(&argument.path))
}

fn assemble_union(
    union: &UnionSpec,
    parsed: &ParsedValues,
    consumed: &mut ConsumedKeys,
) -> Result<Value, InstantiationError> {
    let name = match parsed.selection(&union.path) {
        Some(name) => {
            consumed.selections.insert(union.path.clone());
            name
        }
        None => union
            .default
            .as_deref()
            .ok_or_else(|| InstantiationError::missing_variant(&union.path))?,
    };
    let variant = union
        .variant(name)
        .ok_or_else(|| InstantiationError::unknown_variant(&union.path, name))?;
    trace!(path = %union.path, variant = %variant.name, "assembling variant");
    let payload = assemble_node(&variant.node, parsed, consumed)?;
    Ok(variant.tag.wrap(payload))
}

/// Runs the constructors of `T` over an assembled value.
///
/// # Errors
///
/// Returns [`InstantiationError::Constructor`] with the path serde was at when
/// deserialization failed, including validation performed by
/// `#[serde(try_from = "...")]` conversions.
pub fn instantiate<T: DeserializeOwned>(value: Value) -> Result<T, InstantiationError> {
    serde_path_to_error::deserialize(value).map_err(InstantiationError::constructor)
}

#[cfg(test)]
mod tests;
