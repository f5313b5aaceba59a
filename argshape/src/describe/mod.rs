//! Static type descriptions consumed by the decomposer.
//!
//! A [`TypeDesc`] is the raw, possibly wrapped description a type reports
//! through [`Describe`]. Records are referenced lazily through [`RecordRef`]
//! so a self-referential type can be described without recursing forever;
//! the specification builder resolves them one level at a time.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

mod impls;

/// Implemented by every type that can appear in a derived command line.
///
/// Scalars and standard containers are covered by this crate. Structs and
/// enums implement it through `#[derive(ArgShape)]`.
pub trait Describe {
    /// Returns the description of `Self`.
    fn describe() -> TypeDesc;
}

/// Implemented by record types so their field list can be resolved lazily.
pub trait Record: Describe {
    /// Returns the field list and documentation for `Self`.
    fn record_schema() -> RecordSchema;
}

/// Primitive value kinds a single command-line token converts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `true` or `false`.
    Bool,
    /// Exactly one character.
    Char,
    /// Arbitrary UTF-8 text.
    Str,
    /// A filesystem path, carried as text.
    Path,
    /// A signed or unsigned integer of at most 64 bits.
    Int {
        /// Width in bits.
        bits: u8,
        /// Whether negative values are accepted.
        signed: bool,
    },
    /// A floating-point number.
    Float {
        /// Width in bits.
        bits: u8,
    },
}

impl ScalarKind {
    /// Placeholder shown in usage text for values of this kind.
    #[must_use]
    pub const fn metavar(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Char => "CHAR",
            Self::Str => "STR",
            Self::Path => "PATH",
            Self::Int { .. } => "INT",
            Self::Float { .. } => "FLOAT",
        }
    }
}

/// Closed set of allowed values for a literal-enum field.
///
/// Values are the serialized forms the field deserializes from, so a unit
/// enum contributes its serde variant names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralSet {
    values: Vec<Value>,
}

impl LiteralSet {
    /// Creates a literal set from serialized values.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Creates a literal set of string choices.
    #[must_use]
    pub fn strings(choices: &[&str]) -> Self {
        Self::new(
            choices
                .iter()
                .map(|choice| Value::String((*choice).to_owned()))
                .collect(),
        )
    }

    /// Returns the allowed values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the token spelling of every allowed value.
    pub fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.values.iter().map(literal_token)
    }

    /// Finds the allowed value spelled `token` on the command line.
    #[must_use]
    pub fn find(&self, token: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|value| literal_token(value) == token)
    }
}

/// Renders a literal value the way a user types it.
pub(crate) fn literal_token(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Lazy handle on a record's field list.
#[derive(Clone)]
pub struct RecordRef {
    type_name: Cow<'static, str>,
    schema: fn() -> RecordSchema,
}

impl RecordRef {
    /// Creates a handle from a type name and schema constructor.
    #[must_use]
    pub const fn new(type_name: Cow<'static, str>, schema: fn() -> RecordSchema) -> Self {
        Self { type_name, schema }
    }

    /// Creates a handle for a derived record type.
    #[must_use]
    pub fn of<T: Record>() -> Self {
        Self::new(Cow::Borrowed(std::any::type_name::<T>()), T::record_schema)
    }

    /// Fully qualified name identifying the record on a recursion path.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Resolves the record's field list.
    #[must_use]
    pub fn resolve(&self) -> RecordSchema {
        (self.schema)()
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.type_name).finish()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

/// Field list and documentation of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// Short display name of the record.
    pub name: &'static str,
    /// Record-level documentation, used as the command description.
    pub description: Option<&'static str>,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Attaches record documentation.
    #[must_use]
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }
}

/// Declared default of a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldDefault {
    /// No default was declared.
    #[default]
    Absent,
    /// The serialized default value.
    Value(Value),
    /// The declared default could not be serialized.
    Unserializable(String),
}

impl FieldDefault {
    /// Serializes a declared default value.
    #[must_use]
    pub fn serialize<V: Serialize + ?Sized>(value: &V) -> Self {
        serde_json::to_value(value).map_or_else(|err| Self::Unserializable(err.to_string()), Self::Value)
    }
}

/// One named field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Segment used in dotted paths and flag names.
    pub name: &'static str,
    /// Key the field occupies in the serialized record.
    pub key: &'static str,
    /// Description of the field's type.
    pub ty: TypeDesc,
    /// Help text taken from the field documentation.
    pub help: Option<&'static str>,
    /// Declared default.
    pub default: FieldDefault,
}

impl FieldSchema {
    /// Creates a field without help text or default.
    #[must_use]
    pub const fn new(name: &'static str, key: &'static str, ty: TypeDesc) -> Self {
        Self {
            name,
            key,
            ty,
            help: None,
            default: FieldDefault::Absent,
        }
    }

    /// Attaches help text.
    #[must_use]
    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Declares a default value.
    #[must_use]
    pub fn with_default<V: Serialize + ?Sized>(mut self, value: &V) -> Self {
        self.default = FieldDefault::serialize(value);
        self
    }

    /// Marks the field as fixed: hidden from the command line and frozen to
    /// its default.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.ty = TypeDesc::Fixed(Box::new(self.ty));
        self
    }
}

/// One alternative of a union.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDesc {
    /// Sub-command name selecting the variant.
    pub name: &'static str,
    /// Serialized variant tag.
    pub tag: &'static str,
    /// Help text taken from the variant documentation.
    pub help: Option<&'static str>,
    /// Payload description; `None` for unit variants.
    pub payload: Option<Box<TypeDesc>>,
}

impl VariantDesc {
    /// Creates a variant carrying a record payload.
    #[must_use]
    pub fn record(name: &'static str, tag: &'static str, payload: TypeDesc) -> Self {
        Self {
            name,
            tag,
            help: None,
            payload: Some(Box::new(payload)),
        }
    }

    /// Creates a variant without payload.
    #[must_use]
    pub const fn unit(name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            tag,
            help: None,
            payload: None,
        }
    }

    /// Attaches help text.
    #[must_use]
    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

/// A type that is exactly one of several record variants.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDesc {
    /// Fully qualified name of the union type.
    pub type_name: &'static str,
    /// Type-level documentation.
    pub description: Option<&'static str>,
    /// Variants in declaration order.
    pub variants: Vec<VariantDesc>,
}

impl UnionDesc {
    /// Creates a union without variants.
    #[must_use]
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            description: None,
            variants: Vec::new(),
        }
    }

    /// Attaches union documentation.
    #[must_use]
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Appends a variant.
    #[must_use]
    pub fn variant(mut self, variant: VariantDesc) -> Self {
        self.variants.push(variant);
        self
    }
}

/// Raw description of a type, possibly wrapped in markers.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    /// A single-token value.
    Scalar(ScalarKind),
    /// A value that may be absent.
    Optional(Box<TypeDesc>),
    /// A growable sequence.
    Sequence(Box<TypeDesc>),
    /// A fixed number of positionally typed items.
    FixedTuple(Vec<TypeDesc>),
    /// A variable number of items of one type, frozen after construction.
    VariableTuple(Box<TypeDesc>),
    /// Key/value pairs.
    Mapping(Box<TypeDesc>, Box<TypeDesc>),
    /// A set of distinct items.
    Set(Box<TypeDesc>),
    /// One of a closed set of values.
    Literal(LiteralSet),
    /// A nested record.
    Record(RecordRef),
    /// A union of records.
    Union(UnionDesc),
    /// A generic parameter bound to a concrete type.
    TypeVar {
        /// Parameter name as written in the generic declaration.
        name: &'static str,
        /// Description of the concrete argument.
        bound: Box<TypeDesc>,
    },
    /// Excluded from the command line; always takes its default.
    Fixed(Box<TypeDesc>),
    /// Carries documentation alongside the wrapped type.
    Annotated {
        /// Wrapped description.
        inner: Box<TypeDesc>,
        /// Help text attached by the wrapper.
        help: Option<&'static str>,
    },
    /// A type that cannot be expressed on a command line.
    Opaque {
        /// Name of the offending type.
        name: &'static str,
    },
}

impl TypeDesc {
    /// Describes a generic parameter bound to `bound`.
    #[must_use]
    pub fn type_var(name: &'static str, bound: Self) -> Self {
        Self::TypeVar {
            name,
            bound: Box::new(bound),
        }
    }

    /// Wraps `inner` with help text.
    #[must_use]
    pub fn annotated(inner: Self, help: &'static str) -> Self {
        Self::Annotated {
            inner: Box::new(inner),
            help: Some(help),
        }
    }
}
