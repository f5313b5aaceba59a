//! Parser specification trees built from type descriptions.
//!
//! [`SpecBuilder`] walks a record's fields, decomposes each one, and emits a
//! [`ParserSpecification`]: the flags of the current scope plus nested
//! groups, unions and pinned variants. The tree is consumed by the clap
//! bridge to render the command and by the assembly engine to rebuild the
//! value.

use serde_json::Value;
use tracing::debug;

use crate::defaults::{self, SelectedVariant};
use crate::describe::{FieldDefault, FieldSchema, RecordRef, TypeDesc};
use crate::error::SchemaError;
use crate::shape::{TypeShape, UnionShape, decompose};

/// Sub-command name of the alternative that leaves an optional union unset.
pub const NONE_VARIANT: &str = "none";

/// One flag of the rendered command.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Absolute dotted path of the field.
    pub path: String,
    /// Flag name relative to the enclosing sub-command.
    pub name: String,
    /// Key the value occupies in its record.
    pub key: String,
    /// Leaf shape of the value.
    pub shape: TypeShape,
    /// Default value; `None` marks the flag as required.
    pub default: Option<Value>,
    /// Help text.
    pub help: Option<String>,
    /// Whether the field is hidden and frozen to its default.
    pub fixed: bool,
}

impl ArgumentSpec {
    /// Returns `true` when the flag must be given.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Serialized form a selected variant wraps its payload in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantTag {
    /// A variant carrying a record, serialized as `{ tag: payload }`.
    Record(String),
    /// A unit variant, serialized as its tag string.
    Unit(String),
    /// The `none` alternative of an optional union.
    Null,
}

impl VariantTag {
    /// Wraps an assembled payload the way serde expects the variant.
    #[must_use]
    pub fn wrap(&self, payload: Value) -> Value {
        match self {
            Self::Record(tag) => {
                let mut entries = serde_json::Map::new();
                entries.insert(tag.clone(), payload);
                Value::Object(entries)
            }
            Self::Unit(tag) => Value::String(tag.clone()),
            Self::Null => Value::Null,
        }
    }
}

/// One sub-command of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSpec {
    /// Sub-command name.
    pub name: String,
    /// Serialized tag.
    pub tag: VariantTag,
    /// Help text.
    pub help: Option<String>,
    /// Flags and children of the variant's record.
    pub node: ParserSpecification,
}

/// A union field rendered as a layer of sub-commands.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSpec {
    /// Key the union occupies in its record; empty for a root union.
    pub key: String,
    /// Absolute dotted path of the union.
    pub path: String,
    /// Variants in declaration order.
    pub variants: Vec<VariantSpec>,
    /// Name of the variant used when none is selected.
    pub default: Option<String>,
    /// Help text.
    pub help: Option<String>,
}

impl UnionSpec {
    /// Finds the variant with sub-command `name`.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&VariantSpec> {
        self.variants.iter().find(|variant| variant.name == name)
    }
}

/// A nested node of a specification.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildSpec {
    /// A nested record, always active.
    Group {
        /// Key the record occupies in its parent.
        key: String,
        /// The record's flags and children.
        node: ParserSpecification,
    },
    /// A union, active only through its selected sub-command.
    Union(UnionSpec),
    /// A union frozen to one variant whose flags join the parent scope.
    PinnedVariant {
        /// Key the union occupies in its parent.
        key: String,
        /// Tag of the pinned variant.
        tag: VariantTag,
        /// The variant's flags and children.
        node: ParserSpecification,
    },
}

/// Flags and children of one record, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParserSpecification {
    /// Display name of the record.
    pub name: String,
    /// Record documentation.
    pub description: Option<String>,
    /// Leaf flags, fixed fields included.
    pub arguments: Vec<ArgumentSpec>,
    /// Nested groups, unions and pinned variants.
    pub children: Vec<ChildSpec>,
    /// Set when the node only forwards a root union.
    pub passthrough: bool,
}

impl ParserSpecification {
    /// Returns the flags the command line exposes in this scope,
    /// including those of nested groups and pinned variants.
    #[must_use]
    pub fn visible_arguments(&self) -> Vec<&ArgumentSpec> {
        let mut arguments = Vec::new();
        self.collect_arguments(&mut arguments);
        arguments
    }

    fn collect_arguments<'a>(&'a self, arguments: &mut Vec<&'a ArgumentSpec>) {
        arguments.extend(self.arguments.iter().filter(|argument| !argument.fixed));
        for child in &self.children {
            if let ChildSpec::Group { node, .. } | ChildSpec::PinnedVariant { node, .. } = child {
                node.collect_arguments(arguments);
            }
        }
    }

    /// Returns the unions reachable in this scope, in declaration order.
    #[must_use]
    pub fn scope_unions(&self) -> Vec<&UnionSpec> {
        let mut unions = Vec::new();
        self.collect_unions(&mut unions);
        unions
    }

    fn collect_unions<'a>(&'a self, unions: &mut Vec<&'a UnionSpec>) {
        for child in &self.children {
            match child {
                ChildSpec::Group { node, .. } | ChildSpec::PinnedVariant { node, .. } => {
                    node.collect_unions(unions);
                }
                ChildSpec::Union(union) => unions.push(union),
            }
        }
    }
}

/// Path and flag-name prefixes of the record being built.
#[derive(Debug, Clone)]
struct Scope {
    path: String,
    name: String,
}

impl Scope {
    const fn root() -> Self {
        Self {
            path: String::new(),
            name: String::new(),
        }
    }

    fn path_of(&self, segment: &str) -> String {
        format!("{}{segment}", self.path)
    }

    /// Scope of a nested group: both prefixes grow.
    fn group(&self, segment: &str) -> Self {
        Self {
            path: format!("{}{segment}.", self.path),
            name: format!("{}{segment}.", self.name),
        }
    }

    /// Scope of a sub-command: paths continue, names restart.
    fn subcommand(union_path: &str) -> Self {
        Self {
            path: child_prefix(union_path),
            name: String::new(),
        }
    }
}

fn child_prefix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{path}.")
    }
}

/// Builds [`ParserSpecification`] trees.
///
/// # Examples
///
/// ```
/// use argshape::{ArgShape, Describe, SpecBuilder};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(ArgShape, Serialize, Deserialize)]
/// struct Point {
///     x: i64,
///     y: Option<String>,
/// }
///
/// let spec = SpecBuilder::new().build(&Point::describe(), None)?;
/// let names: Vec<_> = spec.arguments.iter().map(|arg| arg.name.as_str()).collect();
/// assert_eq!(names, ["x", "y"]);
/// assert!(spec.arguments[0].is_required());
/// # Ok::<(), argshape::SchemaError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecBuilder {
    avoid_subparsers: bool,
}

impl SpecBuilder {
    /// Creates a builder that renders every union as sub-commands.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            avoid_subparsers: false,
        }
    }

    /// Flattens unions that have a default into the parent scope instead of
    /// rendering sub-commands for them.
    #[must_use]
    pub const fn avoid_subparsers(mut self, avoid: bool) -> Self {
        self.avoid_subparsers = avoid;
        self
    }

    /// Builds the specification of a root record or union.
    ///
    /// `defaults` is the serialized default instance, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a field cannot be expressed, a record
    /// contains itself, or the default instance does not fit the type.
    pub fn build(
        &self,
        root: &TypeDesc,
        defaults: Option<&Value>,
    ) -> Result<ParserSpecification, SchemaError> {
        let decomposed = decompose(root, "")?;
        let mut parents = Vec::new();
        let spec = match decomposed.shape {
            TypeShape::Record(record) => {
                self.build_record(&record, &Scope::root(), &mut parents, defaults)?
            }
            TypeShape::UnionOfRecords(union) => {
                let declared = FieldDefault::Absent;
                let selected = defaults::union_default(&union, false, defaults, &declared, "")?;
                let child = self.build_union(
                    &union,
                    false,
                    "",
                    "",
                    &Scope::root(),
                    None,
                    selected,
                    &mut parents,
                )?;
                ParserSpecification {
                    name: short_name(union.type_name).to_owned(),
                    description: union.description.map(str::to_owned),
                    arguments: Vec::new(),
                    children: vec![child],
                    passthrough: true,
                }
            }
            _ => {
                return Err(SchemaError::unsupported(
                    "",
                    "the root type must be a record or a union of records",
                ));
            }
        };
        debug!(
            name = %spec.name,
            arguments = spec.arguments.len(),
            children = spec.children.len(),
            "built parser specification"
        );
        Ok(spec)
    }

    fn build_record(
        &self,
        record: &RecordRef,
        scope: &Scope,
        parents: &mut Vec<String>,
        defaults: Option<&Value>,
    ) -> Result<ParserSpecification, SchemaError> {
        let type_name = record.type_name().to_owned();
        if parents.contains(&type_name) {
            let at = scope.path.trim_end_matches('.');
            return Err(SchemaError::recursive(at, &type_name));
        }
        parents.push(type_name);
        let schema = record.resolve();
        let mut spec = ParserSpecification {
            name: schema.name.to_owned(),
            description: schema.description.map(str::to_owned),
            ..ParserSpecification::default()
        };
        for field in &schema.fields {
            self.build_field(field, scope, parents, defaults, &mut spec)?;
        }
        parents.pop();
        Ok(spec)
    }

    fn build_field(
        &self,
        field: &FieldSchema,
        scope: &Scope,
        parents: &mut Vec<String>,
        record_defaults: Option<&Value>,
        spec: &mut ParserSpecification,
    ) -> Result<(), SchemaError> {
        let path = scope.path_of(field.name);
        let decomposed = decompose(&field.ty, &path)?;
        let fallback = defaults::has_fallback(&decomposed.shape, &field.default);
        let instance = defaults::field_slice(record_defaults, field.key, &path, fallback)?;
        let help = decomposed.help.or(field.help).map(str::to_owned);

        if decomposed.fixed {
            let default = match decomposed.shape {
                ref shape if shape.is_leaf() => {
                    defaults::leaf_default(shape, instance, &field.default, &path)?
                }
                _ => defaults::record_default(instance, &field.default, &path)?.cloned(),
            };
            let Some(default) = default else {
                return Err(SchemaError::unsupported(
                    &path,
                    "a fixed field needs a default value",
                ));
            };
            spec.arguments.push(ArgumentSpec {
                name: format!("{}{}", scope.name, field.name),
                key: field.key.to_owned(),
                path,
                shape: decomposed.shape,
                default: Some(default),
                help,
                fixed: true,
            });
            return Ok(());
        }

        match decomposed.shape {
            TypeShape::Record(record) => {
                let nested = defaults::record_default(instance, &field.default, &path)?;
                let node =
                    self.build_record(&record, &scope.group(field.name), parents, nested)?;
                spec.children.push(ChildSpec::Group {
                    key: field.key.to_owned(),
                    node,
                });
            }
            TypeShape::UnionOfRecords(union) => {
                let selected =
                    defaults::union_default(&union, false, instance, &field.default, &path)?;
                let child = self.build_union(
                    &union, false, field.key, &path, scope, help, selected, parents,
                )?;
                spec.children.push(child);
            }
            TypeShape::Optional(inner) if matches!(*inner, TypeShape::UnionOfRecords(_)) => {
                let TypeShape::UnionOfRecords(union) = *inner else {
                    return Err(SchemaError::unsupported(&path, "expected a union"));
                };
                let selected =
                    defaults::union_default(&union, true, instance, &field.default, &path)?;
                let child = self.build_union(
                    &union, true, field.key, &path, scope, help, selected, parents,
                )?;
                spec.children.push(child);
            }
            shape => {
                let default = defaults::leaf_default(&shape, instance, &field.default, &path)?;
                spec.arguments.push(ArgumentSpec {
                    name: format!("{}{}", scope.name, field.name),
                    key: field.key.to_owned(),
                    path,
                    shape,
                    default,
                    help,
                    fixed: false,
                });
            }
        }
        Ok(())
    }

    #[expect(
        clippy::too_many_arguments,
        reason = "union placement needs both the field identity and its scope"
    )]
    fn build_union(
        &self,
        union: &UnionShape,
        optional: bool,
        key: &str,
        path: &str,
        scope: &Scope,
        help: Option<String>,
        selected: Option<SelectedVariant<'_>>,
        parents: &mut Vec<String>,
    ) -> Result<ChildSpec, SchemaError> {
        let help = help.or_else(|| union.description.map(str::to_owned));
        if self.avoid_subparsers
            && let Some(chosen) = selected
        {
            let pinned_scope = if key.is_empty() {
                Scope::root()
            } else {
                scope.group(key_segment(path))
            };
            let (tag, node) = self.pinned(chosen, &pinned_scope, parents)?;
            debug!(path, "pinned union to its default variant");
            return Ok(ChildSpec::PinnedVariant {
                key: key.to_owned(),
                tag,
                node,
            });
        }

        let sub_scope = Scope::subcommand(path);
        let mut variants = Vec::with_capacity(union.variants.len() + usize::from(optional));
        let mut default = None;
        for variant in &union.variants {
            let payload = match selected {
                Some(SelectedVariant::Variant {
                    variant: chosen,
                    payload,
                }) if chosen.name == variant.name => {
                    default = Some(variant.name.to_owned());
                    payload
                }
                _ => None,
            };
            let (tag, node) = match &variant.record {
                Some(record) => (
                    VariantTag::Record(variant.tag.to_owned()),
                    self.build_record(record, &sub_scope, parents, payload)?,
                ),
                None => (
                    VariantTag::Unit(variant.tag.to_owned()),
                    ParserSpecification {
                        name: variant.name.to_owned(),
                        ..ParserSpecification::default()
                    },
                ),
            };
            variants.push(VariantSpec {
                name: variant.name.to_owned(),
                tag,
                help: variant.help.map(str::to_owned),
                node,
            });
        }
        if optional {
            if union.variant_named(NONE_VARIANT).is_some() {
                return Err(SchemaError::unsupported(
                    path,
                    format!("variant name '{NONE_VARIANT}' is reserved for optional unions"),
                ));
            }
            if matches!(selected, Some(SelectedVariant::Absent)) {
                default = Some(NONE_VARIANT.to_owned());
            }
            variants.push(VariantSpec {
                name: NONE_VARIANT.to_owned(),
                tag: VariantTag::Null,
                help: Some("Leave the value unset.".to_owned()),
                node: ParserSpecification {
                    name: NONE_VARIANT.to_owned(),
                    ..ParserSpecification::default()
                },
            });
        }
        Ok(ChildSpec::Union(UnionSpec {
            key: key.to_owned(),
            path: path.to_owned(),
            variants,
            default,
            help,
        }))
    }

    fn pinned(
        &self,
        selected: SelectedVariant<'_>,
        scope: &Scope,
        parents: &mut Vec<String>,
    ) -> Result<(VariantTag, ParserSpecification), SchemaError> {
        match selected {
            SelectedVariant::Absent => Ok((VariantTag::Null, ParserSpecification::default())),
            SelectedVariant::Variant { variant, payload } => match &variant.record {
                Some(record) => Ok((
                    VariantTag::Record(variant.tag.to_owned()),
                    self.build_record(record, scope, parents, payload)?,
                )),
                None => Ok((
                    VariantTag::Unit(variant.tag.to_owned()),
                    ParserSpecification {
                        name: variant.name.to_owned(),
                        ..ParserSpecification::default()
                    },
                )),
            },
        }
    }
}

fn key_segment(path: &str) -> &str {
    path.rsplit_once('.').map_or(path, |(_, last)| last)
}

fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}
