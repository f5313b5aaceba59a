//! Default propagation from declared defaults and default instances.
//!
//! A default instance is serialized once and then matched against the schema
//! by explicit field path. A key the schema expects but the instance lacks,
//! or a value whose kind cannot fit the field, is reported as
//! [`SchemaError::AmbiguousDefault`] instead of being silently ignored.

use serde_json::Value;

use crate::describe::FieldDefault;
use crate::error::SchemaError;
use crate::shape::{TypeShape, UnionShape, VariantShape};

mod source;

pub use source::{DefaultsError, DefaultsSource};

/// Default chosen for a union field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SelectedVariant<'a> {
    /// The `none` alternative of an optional union.
    Absent,
    /// A declared variant with its payload defaults.
    Variant {
        variant: &'a VariantShape,
        payload: Option<&'a Value>,
    },
}

/// Returns the slice of a record default that belongs to `key`.
///
/// A key the instance leaves out is only accepted when the field can fall
/// back to its own default; serde omits such keys under
/// `skip_serializing_if`.
pub(crate) fn field_slice<'a>(
    record: Option<&'a Value>,
    key: &str,
    path: &str,
    has_fallback: bool,
) -> Result<Option<&'a Value>, SchemaError> {
    let Some(record) = record else {
        return Ok(None);
    };
    let Value::Object(fields) = record else {
        return Err(SchemaError::ambiguous_default(
            parent_path(path),
            format!("expected a record, found {}", kind_name(record)),
        ));
    };
    match fields.get(key) {
        Some(value) => Ok(Some(value)),
        None if has_fallback => Ok(None),
        None => Err(SchemaError::ambiguous_default(
            path,
            format!("no value for field '{key}'"),
        )),
    }
}

/// Returns `true` when a field has a value of its own to fall back on.
pub(crate) fn has_fallback(shape: &TypeShape, declared: &FieldDefault) -> bool {
    !matches!(declared, FieldDefault::Absent) || matches!(shape, TypeShape::Optional(_))
}

/// Picks the record default for a nested record field: the instance slice
/// when present, else the declared default.
pub(crate) fn record_default<'a>(
    instance: Option<&'a Value>,
    declared: &'a FieldDefault,
    path: &str,
) -> Result<Option<&'a Value>, SchemaError> {
    if instance.is_some() {
        return Ok(instance);
    }
    declared_value(declared, path)
}

/// Computes the default of a leaf field, or `None` when it is required.
pub(crate) fn leaf_default(
    shape: &TypeShape,
    instance: Option<&Value>,
    declared: &FieldDefault,
    path: &str,
) -> Result<Option<Value>, SchemaError> {
    let chosen = match instance {
        Some(value) => Some(value),
        None => declared_value(declared, path)?,
    };
    match chosen {
        Some(value) => {
            check_leaf(shape, value, path)?;
            Ok(Some(value.clone()))
        }
        None if matches!(shape, TypeShape::Optional(_)) => Ok(Some(Value::Null)),
        None => Ok(None),
    }
}

/// Resolves which variant of a union is pre-selected.
pub(crate) fn union_default<'a>(
    union: &'a UnionShape,
    optional: bool,
    instance: Option<&'a Value>,
    declared: &'a FieldDefault,
    path: &str,
) -> Result<Option<SelectedVariant<'a>>, SchemaError> {
    let chosen = match instance {
        Some(value) => Some(value),
        None => declared_value(declared, path)?,
    };
    let Some(value) = chosen else {
        return Ok(optional.then_some(SelectedVariant::Absent));
    };
    match value {
        Value::Null if optional => Ok(Some(SelectedVariant::Absent)),
        Value::String(tag) => {
            let variant = tagged(union, tag, path)?;
            if variant.record.is_some() {
                return Err(SchemaError::ambiguous_default(
                    path,
                    format!("variant '{tag}' carries a record but no payload was given"),
                ));
            }
            Ok(Some(SelectedVariant::Variant {
                variant,
                payload: None,
            }))
        }
        Value::Object(entries) if entries.len() == 1 => {
            let Some((tag, payload)) = entries.iter().next() else {
                return Err(SchemaError::ambiguous_default(path, "empty variant object"));
            };
            let variant = tagged(union, tag, path)?;
            if variant.record.is_none() {
                return Err(SchemaError::ambiguous_default(
                    path,
                    format!("variant '{tag}' has no fields but a payload was given"),
                ));
            }
            Ok(Some(SelectedVariant::Variant {
                variant,
                payload: Some(payload),
            }))
        }
        other => Err(SchemaError::ambiguous_default(
            path,
            format!(
                "expected an externally tagged variant of `{}`, found {}",
                union.type_name,
                kind_name(other)
            ),
        )),
    }
}

fn tagged<'a>(union: &'a UnionShape, tag: &str, path: &str) -> Result<&'a VariantShape, SchemaError> {
    union.variant_tagged(tag).ok_or_else(|| {
        SchemaError::ambiguous_default(path, format!("unknown variant '{tag}'"))
    })
}

fn declared_value<'a>(declared: &'a FieldDefault, path: &str) -> Result<Option<&'a Value>, SchemaError> {
    match declared {
        FieldDefault::Absent => Ok(None),
        FieldDefault::Value(value) => Ok(Some(value)),
        FieldDefault::Unserializable(reason) => Err(SchemaError::ambiguous_default(
            path,
            format!("declared default cannot be serialized: {reason}"),
        )),
    }
}

/// Checks that a default value can be carried by a leaf shape.
pub(crate) fn check_leaf(shape: &TypeShape, value: &Value, path: &str) -> Result<(), SchemaError> {
    let fits = match (shape, value) {
        (TypeShape::Optional(_), Value::Null) => true,
        (TypeShape::Optional(inner), other) => return check_leaf(inner, other, path),
        (TypeShape::Scalar(kind), other) => scalar_fits(*kind, other),
        (TypeShape::Literal(set), other) => set.values().contains(other),
        (
            TypeShape::Sequence(item) | TypeShape::Set(item) | TypeShape::VariableTuple(item),
            Value::Array(items),
        ) => {
            for entry in items {
                check_leaf(item, entry, path)?;
            }
            true
        }
        (TypeShape::FixedTuple(shapes), Value::Array(items)) if shapes.len() == items.len() => {
            for (item, entry) in shapes.iter().zip(items) {
                check_leaf(item, entry, path)?;
            }
            true
        }
        (TypeShape::Mapping(_, item), Value::Object(entries)) => {
            for entry in entries.values() {
                check_leaf(item, entry, path)?;
            }
            true
        }
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(SchemaError::ambiguous_default(
            path,
            format!("{} cannot be used as {}", kind_name(value), shape_name(shape)),
        ))
    }
}

fn scalar_fits(kind: crate::describe::ScalarKind, value: &Value) -> bool {
    use crate::describe::ScalarKind;
    match (kind, value) {
        (ScalarKind::Bool, Value::Bool(_)) => true,
        (ScalarKind::Str | ScalarKind::Path, Value::String(_)) => true,
        (ScalarKind::Char, Value::String(text)) => text.chars().count() == 1,
        (ScalarKind::Int { signed, .. }, Value::Number(number)) => {
            number.is_u64() || (signed && number.is_i64())
        }
        (ScalarKind::Float { .. }, Value::Number(_)) => true,
        _ => false,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a record",
    }
}

fn shape_name(shape: &TypeShape) -> &'static str {
    match shape {
        TypeShape::Scalar(_) => "a scalar",
        TypeShape::Optional(_) => "an optional value",
        TypeShape::Sequence(_) => "a sequence",
        TypeShape::FixedTuple(_) => "a tuple of matching length",
        TypeShape::VariableTuple(_) => "a tuple",
        TypeShape::Mapping(..) => "a mapping",
        TypeShape::Set(_) => "a set",
        TypeShape::Literal(_) => "one of the allowed literals",
        TypeShape::Record(_) => "a record",
        TypeShape::UnionOfRecords(_) => "a union",
    }
}

fn parent_path(path: &str) -> &str {
    path.rsplit_once('.').map_or("", |(parent, _)| parent)
}

#[cfg(test)]
mod tests;
