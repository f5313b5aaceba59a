//! Classification of type descriptions into a closed set of shapes.
//!
//! [`decompose`] strips the markers a field may carry (fixed, annotated,
//! bound generic parameters), then checks that what remains is something a
//! flat command line can express. Every other combination is rejected with
//! [`SchemaError::UnsupportedType`] naming the field path.

use std::collections::HashSet;

use serde_json::Value;

use crate::describe::{LiteralSet, RecordRef, ScalarKind, TypeDesc, UnionDesc};
use crate::error::SchemaError;

/// Normalised shape of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// A single-token value.
    Scalar(ScalarKind),
    /// A value that may be absent.
    Optional(Box<TypeShape>),
    /// A growable sequence of items.
    Sequence(Box<TypeShape>),
    /// Positionally typed items.
    FixedTuple(Vec<TypeShape>),
    /// Any number of items of one type.
    VariableTuple(Box<TypeShape>),
    /// Key/value pairs.
    Mapping(Box<TypeShape>, Box<TypeShape>),
    /// Distinct items.
    Set(Box<TypeShape>),
    /// One of a closed set of values.
    Literal(LiteralSet),
    /// A nested record, resolved lazily by the builder.
    Record(RecordRef),
    /// A union of records.
    UnionOfRecords(UnionShape),
}

impl TypeShape {
    /// Returns `true` for shapes rendered as a single flag.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        match self {
            Self::Record(_) | Self::UnionOfRecords(_) => false,
            Self::Optional(inner) => inner.is_leaf(),
            _ => true,
        }
    }

    /// Returns the shape with one `Optional` layer removed.
    #[must_use]
    pub fn strip_optional(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// Placeholder shown in usage text for one value of this shape.
    #[must_use]
    pub fn metavar(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.metavar().to_owned(),
            Self::Literal(set) => format!("{{{}}}", set.tokens().collect::<Vec<_>>().join(",")),
            Self::Optional(inner)
            | Self::Sequence(inner)
            | Self::VariableTuple(inner)
            | Self::Set(inner) => inner.metavar(),
            Self::Mapping(key, value) => format!("{} {}", key.metavar(), value.metavar()),
            Self::FixedTuple(items) => items
                .iter()
                .map(Self::metavar)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Record(_) | Self::UnionOfRecords(_) => String::new(),
        }
    }
}

/// Validated union with its variants' records.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionShape {
    /// Fully qualified name of the union type.
    pub type_name: &'static str,
    /// Type-level documentation.
    pub description: Option<&'static str>,
    /// Variants in declaration order.
    pub variants: Vec<VariantShape>,
}

impl UnionShape {
    /// Finds the variant selected by `name`.
    #[must_use]
    pub fn variant_named(&self, name: &str) -> Option<&VariantShape> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    /// Finds the variant serialized with `tag`.
    #[must_use]
    pub fn variant_tagged(&self, tag: &str) -> Option<&VariantShape> {
        self.variants.iter().find(|variant| variant.tag == tag)
    }
}

/// One validated union alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantShape {
    /// Sub-command name.
    pub name: &'static str,
    /// Serialized tag.
    pub tag: &'static str,
    /// Help text.
    pub help: Option<&'static str>,
    /// Record payload; `None` for unit variants.
    pub record: Option<RecordRef>,
}

/// Result of decomposing one field description.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposed {
    /// Normalised shape.
    pub shape: TypeShape,
    /// Whether the field is hidden from the command line.
    pub fixed: bool,
    /// Help text carried by an annotation marker.
    pub help: Option<&'static str>,
}

/// Where a description sits relative to its field, which bounds what it may
/// contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Field,
    Optional,
    Element,
}

/// Classifies a field description.
///
/// Outer `Fixed` and `Annotated` markers are recorded and stripped, bound
/// generic parameters are replaced by their concrete description, and the
/// remaining shape is validated.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedType`] when the description cannot be
/// expressed as command-line flags.
///
/// # Examples
///
/// ```
/// use argshape::{Describe, TypeShape, decompose, ScalarKind};
///
/// let decomposed = decompose(&<Vec<u8>>::describe(), "bytes")?;
/// assert_eq!(
///     decomposed.shape,
///     TypeShape::Sequence(Box::new(TypeShape::Scalar(ScalarKind::Int { bits: 8, signed: false }))),
/// );
/// # Ok::<(), argshape::SchemaError>(())
/// ```
pub fn decompose(desc: &TypeDesc, path: &str) -> Result<Decomposed, SchemaError> {
    let mut fixed = false;
    let mut help = None;
    let mut current = desc;
    loop {
        match current {
            TypeDesc::Fixed(inner) => {
                fixed = true;
                current = inner;
            }
            TypeDesc::Annotated { inner, help: text } => {
                help = help.or(*text);
                current = inner;
            }
            TypeDesc::TypeVar { bound, .. } => current = bound,
            _ => break,
        }
    }
    let shape = classify(current, path, Position::Field)?;
    Ok(Decomposed { shape, fixed, help })
}

fn classify(desc: &TypeDesc, path: &str, position: Position) -> Result<TypeShape, SchemaError> {
    match desc {
        TypeDesc::Scalar(kind) => Ok(TypeShape::Scalar(*kind)),
        TypeDesc::Literal(set) => {
            validate_literals(set, path)?;
            Ok(TypeShape::Literal(set.clone()))
        }
        TypeDesc::TypeVar { bound, .. } => classify(bound, path, position),
        TypeDesc::Annotated { inner, .. } => classify(inner, path, position),
        TypeDesc::Fixed(_) => Err(SchemaError::unsupported(
            path,
            "a fixed marker must wrap the whole field",
        )),
        TypeDesc::Opaque { name } => Err(SchemaError::unsupported(
            path,
            format!("`{name}` cannot be expressed on the command line"),
        )),
        TypeDesc::Optional(inner) => classify_optional(inner, path, position),
        TypeDesc::Sequence(inner) => {
            container(path, position, "sequences")?;
            Ok(TypeShape::Sequence(Box::new(element(inner, path)?)))
        }
        TypeDesc::Set(inner) => {
            container(path, position, "sets")?;
            Ok(TypeShape::Set(Box::new(element(inner, path)?)))
        }
        TypeDesc::VariableTuple(inner) => {
            container(path, position, "variable-length tuples")?;
            Ok(TypeShape::VariableTuple(Box::new(element(inner, path)?)))
        }
        TypeDesc::FixedTuple(items) => {
            container(path, position, "tuples")?;
            if items.is_empty() {
                return Err(SchemaError::unsupported(path, "empty tuples carry no value"));
            }
            let shapes = items
                .iter()
                .map(|item| element(item, path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeShape::FixedTuple(shapes))
        }
        TypeDesc::Mapping(key, value) => {
            container(path, position, "mappings")?;
            Ok(TypeShape::Mapping(
                Box::new(element(key, path)?),
                Box::new(element(value, path)?),
            ))
        }
        TypeDesc::Record(record) => {
            if position == Position::Element {
                return Err(SchemaError::unsupported(
                    path,
                    format!(
                        "record `{}` cannot be nested in a container",
                        record.type_name()
                    ),
                ));
            }
            Ok(TypeShape::Record(record.clone()))
        }
        TypeDesc::Union(union) => {
            if position == Position::Element {
                return Err(SchemaError::unsupported(
                    path,
                    format!("union `{}` cannot be nested in a container", union.type_name),
                ));
            }
            Ok(TypeShape::UnionOfRecords(validate_union(union, path)?))
        }
    }
}

fn classify_optional(
    inner: &TypeDesc,
    path: &str,
    position: Position,
) -> Result<TypeShape, SchemaError> {
    if position != Position::Field {
        return Err(SchemaError::unsupported(
            path,
            "optional values may only appear directly as a field",
        ));
    }
    let shape = classify(inner, path, Position::Optional)?;
    match shape {
        TypeShape::Record(record) => Err(SchemaError::unsupported(
            path,
            format!(
                "optional record `{}`; use a union with a unit variant instead",
                record.type_name()
            ),
        )),
        other => Ok(TypeShape::Optional(Box::new(other))),
    }
}

fn container(path: &str, position: Position, what: &str) -> Result<(), SchemaError> {
    if position == Position::Element {
        return Err(SchemaError::unsupported(
            path,
            format!("{what} cannot be nested in another container"),
        ));
    }
    Ok(())
}

fn element(desc: &TypeDesc, path: &str) -> Result<TypeShape, SchemaError> {
    let shape = classify(desc, path, Position::Element)?;
    match shape {
        TypeShape::Scalar(_) | TypeShape::Literal(_) => Ok(shape),
        _ => Err(SchemaError::unsupported(
            path,
            "container items must be scalars or literals",
        )),
    }
}

#[derive(PartialEq, Eq)]
enum LiteralKind {
    String,
    Number,
    Bool,
}

fn literal_kind(value: &Value) -> Option<LiteralKind> {
    match value {
        Value::String(_) => Some(LiteralKind::String),
        Value::Number(_) => Some(LiteralKind::Number),
        Value::Bool(_) => Some(LiteralKind::Bool),
        _ => None,
    }
}

fn validate_literals(set: &LiteralSet, path: &str) -> Result<(), SchemaError> {
    let Some(first) = set.values().first() else {
        return Err(SchemaError::unsupported(path, "literal set has no values"));
    };
    let kind = literal_kind(first)
        .ok_or_else(|| SchemaError::unsupported(path, "literal values must be scalars"))?;
    let mut seen = HashSet::new();
    for (value, token) in set.values().iter().zip(set.tokens()) {
        if literal_kind(value).as_ref() != Some(&kind) {
            return Err(SchemaError::unsupported(
                path,
                "literal values must all have the same kind",
            ));
        }
        if !seen.insert(token.clone()) {
            return Err(SchemaError::unsupported(
                path,
                format!("literal value '{token}' is listed twice"),
            ));
        }
    }
    Ok(())
}

fn validate_union(union: &UnionDesc, path: &str) -> Result<UnionShape, SchemaError> {
    if union.variants.is_empty() {
        return Err(SchemaError::unsupported(
            path,
            format!("union `{}` has no variants", union.type_name),
        ));
    }
    let mut names = HashSet::new();
    let mut tags = HashSet::new();
    let mut variants = Vec::with_capacity(union.variants.len());
    for variant in &union.variants {
        if !names.insert(variant.name) {
            return Err(SchemaError::unsupported(
                path,
                format!("variant name '{}' is used twice", variant.name),
            ));
        }
        if !tags.insert(variant.tag) {
            return Err(SchemaError::unsupported(
                path,
                format!("variant tag '{}' is used twice", variant.tag),
            ));
        }
        let record = match &variant.payload {
            None => None,
            Some(payload) => Some(variant_record(payload, path, variant.name)?),
        };
        variants.push(VariantShape {
            name: variant.name,
            tag: variant.tag,
            help: variant.help,
            record,
        });
    }
    Ok(UnionShape {
        type_name: union.type_name,
        description: union.description,
        variants,
    })
}

fn variant_record(payload: &TypeDesc, path: &str, name: &str) -> Result<RecordRef, SchemaError> {
    match payload {
        TypeDesc::Record(record) => Ok(record.clone()),
        TypeDesc::TypeVar { bound: inner, .. } | TypeDesc::Annotated { inner, .. } => {
            variant_record(inner, path, name)
        }
        _ => Err(SchemaError::unsupported(
            path,
            format!("variant '{name}' must carry a record"),
        )),
    }
}

#[cfg(test)]
mod tests;
