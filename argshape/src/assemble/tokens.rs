//! The inverse walk: from a serialized value back to command-line tokens.
//!
//! [`disassemble`] splits a value into the flat form the clap bridge
//! produces, and [`render_tokens`] spells that form as the arguments that
//! would parse into it. Together they let callers check that a value
//! survives a trip through the command line.

use serde_json::Value;

use crate::describe::{ScalarKind, literal_token};
use crate::error::InstantiationError;
use crate::parser::ParsedValues;
use crate::shape::TypeShape;
use crate::spec::{ArgumentSpec, ChildSpec, ParserSpecification, UnionSpec, VariantTag};

/// Splits `value` into parsed values and union selections following `spec`.
///
/// Fixed fields are skipped.
///
/// # Errors
///
/// Returns [`InstantiationError::MissingValue`] when a record lacks a field
/// and [`InstantiationError::UnknownVariant`] when a union value carries a
/// tag the specification does not know.
pub fn disassemble(
    spec: &ParserSpecification,
    value: &Value,
) -> Result<ParsedValues, InstantiationError> {
    let mut parsed = ParsedValues::new();
    if spec.passthrough {
        match spec.children.first() {
            Some(ChildSpec::Union(union)) => split_union(union, value, &mut parsed)?,
            Some(ChildSpec::PinnedVariant { tag, node, .. }) => {
                split_pinned(tag, node, value, "", &mut parsed)?;
            }
            _ => return Err(InstantiationError::missing_variant("")),
        }
    } else {
        split_node(spec, value, "", &mut parsed)?;
    }
    Ok(parsed)
}

fn split_node(
    node: &ParserSpecification,
    value: &Value,
    path: &str,
    parsed: &mut ParsedValues,
) -> Result<(), InstantiationError> {
    let Value::Object(record) = value else {
        return Err(InstantiationError::missing(path));
    };
    for argument in node.arguments.iter().filter(|argument| !argument.fixed) {
        let field = record
            .get(&argument.key)
            .ok_or_else(|| InstantiationError::missing(&argument.path))?;
        parsed.insert(argument.path.clone(), field.clone());
    }
    for child in &node.children {
        match child {
            ChildSpec::Group { key, node: group } => {
                let field = record
                    .get(key)
                    .ok_or_else(|| InstantiationError::missing(&join(path, key)))?;
                split_node(group, field, &join(path, key), parsed)?;
            }
            ChildSpec::Union(union) => {
                let field = record
                    .get(&union.key)
                    .ok_or_else(|| InstantiationError::missing(&union.path))?;
                split_union(union, field, parsed)?;
            }
            ChildSpec::PinnedVariant { key, tag, node: pinned } => {
                let child_path = join(path, key);
                let field = record
                    .get(key)
                    .ok_or_else(|| InstantiationError::missing(&child_path))?;
                split_pinned(tag, pinned, field, &child_path, parsed)?;
            }
        }
    }
    Ok(())
}

/// Splits a union value frozen to one variant; any other variant is unknown.
fn split_pinned(
    tag: &VariantTag,
    pinned: &ParserSpecification,
    value: &Value,
    path: &str,
    parsed: &mut ParsedValues,
) -> Result<(), InstantiationError> {
    match (tag, value) {
        (VariantTag::Record(name), Value::Object(entries)) => {
            let payload = entries
                .get(name)
                .ok_or_else(|| InstantiationError::unknown_variant(path, name))?;
            split_node(pinned, payload, path, parsed)
        }
        (VariantTag::Unit(name), Value::String(found)) if name == found => Ok(()),
        (VariantTag::Null, Value::Null) => Ok(()),
        (_, other) => Err(InstantiationError::unknown_variant(
            path,
            &literal_token(other),
        )),
    }
}

fn split_union(
    union: &UnionSpec,
    value: &Value,
    parsed: &mut ParsedValues,
) -> Result<(), InstantiationError> {
    let found = union.variants.iter().find_map(|variant| {
        let payload = match (&variant.tag, value) {
            (VariantTag::Null, Value::Null) => Some(None),
            (VariantTag::Unit(tag), Value::String(found)) if tag == found => Some(None),
            (VariantTag::Record(tag), Value::Object(entries)) if entries.len() == 1 => {
                entries.get(tag).map(Some)
            }
            _ => None,
        };
        payload.map(|inner| (variant, inner))
    });
    let Some((variant, payload)) = found else {
        return Err(InstantiationError::unknown_variant(
            &union.path,
            &literal_token(value),
        ));
    };
    parsed.select(union.path.clone(), variant.name.clone());
    match payload {
        Some(inner) => split_node(&variant.node, inner, &union.path, parsed),
        None => Ok(()),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

/// Spells `parsed` as the arguments that parse back into it under `spec`.
///
/// Flags come first in each scope, followed by the sub-command of the next
/// union on the chain. Optional values that are unset are left out.
#[must_use]
pub fn render_tokens(spec: &ParserSpecification, parsed: &ParsedValues) -> Vec<String> {
    let mut tokens = Vec::new();
    render_scope(spec, parsed, &[], &mut tokens);
    tokens
}

fn render_scope(
    node: &ParserSpecification,
    parsed: &ParsedValues,
    pending: &[&UnionSpec],
    tokens: &mut Vec<String>,
) {
    for argument in node.visible_arguments() {
        if let Some(value) = parsed.value(&argument.path) {
            render_argument(argument, value, tokens);
        }
    }
    let mut unions = node.scope_unions();
    unions.extend_from_slice(pending);
    let Some((first, rest)) = unions.split_first() else {
        return;
    };
    let Some(variant) = parsed
        .selection(&first.path)
        .and_then(|name| first.variant(name))
    else {
        return;
    };
    tokens.push(variant.name.clone());
    render_scope(&variant.node, parsed, rest, tokens);
}

fn render_argument(argument: &ArgumentSpec, value: &Value, tokens: &mut Vec<String>) {
    let flag = format!("--{}", argument.name.replace('_', "-"));
    match (argument.shape.strip_optional(), value) {
        (_, Value::Null) => {}
        (TypeShape::Scalar(ScalarKind::Bool), Value::Bool(set))
            if argument.default == Some(Value::Bool(false)) =>
        {
            if *set {
                tokens.push(flag);
            }
        }
        (_, Value::Array(items)) => {
            tokens.push(flag);
            tokens.extend(items.iter().map(literal_token));
        }
        (_, Value::Object(entries)) => {
            tokens.push(flag);
            for (key, item) in entries {
                tokens.push(key.clone());
                tokens.push(literal_token(item));
            }
        }
        (_, other) => {
            tokens.push(flag);
            tokens.push(literal_token(other));
        }
    }
}

/// Converts a serialized value straight into command-line tokens.
///
/// # Errors
///
/// Propagates the errors of [`disassemble`].
pub fn to_tokens(spec: &ParserSpecification, value: &Value) -> Result<Vec<String>, InstantiationError> {
    let parsed = disassemble(spec, value)?;
    Ok(render_tokens(spec, &parsed))
}
