//! In-memory schema graph
//!
//! A [`Schema`] is one node of a parsed schema: a [`SchemaKind`] describing
//! its wire shape, together with an optional [`LogicalType`] annotation that
//! leaves the wire shape untouched but signals a conversion step to the
//! dispatcher.
//!
//! Parsing schemas from their textual definitions is not handled here; this
//! module only provides the graph itself and programmatic constructors for it.
//! A schema graph is treated as immutable once built, and may be shared freely
//! between concurrent readers and writers.
//!
//! # Named types
//!
//! Records, enums, and fixed types carry a [`Name`], whose
//! [full name](Name::full_name) is used for diagnostics and to tell union
//! branches apart. All other node kinds use their type name (`"int"`,
//! `"array"`, ...) as their full name.
//!
//! # Field order
//!
//! The order of fields in a [`RecordSchema`] is significant: it is the order
//! in which fields are laid out on the wire, and the order in which the
//! elements of a positional record value are matched against fields.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use crate::value::Value;

/// Errors raised when constructing a schema node that violates a structural invariant
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A union declared directly inside another union
    #[error("unions may not immediately contain other unions")]
    NestedUnion,
    /// Two union branches that cannot be told apart on the wire
    #[error("duplicate union branch `{0}`")]
    DuplicateBranch(String),
    /// An enum declaring the same symbol twice
    #[error("duplicate enum symbol `{0}`")]
    DuplicateSymbol(String),
}

/// Name of a named schema type, with an optional namespace
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    name: String,
    namespace: Option<String>,
}

impl Name {
    /// Constructs a `Name`.
    ///
    /// A dotted name such as `com.example.Person` is split at its final dot
    /// into namespace and simple name.
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        match name.rsplit_once('.') {
            Some((ns, simple)) => Self {
                name: simple.to_owned(),
                namespace: Some(ns.to_owned()),
            },
            None => Self {
                name,
                namespace: None,
            },
        }
    }

    /// Replaces the namespace of `self`
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Returns the simple (unqualified) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the namespace-qualified name
    pub fn full_name(&self) -> Cow<'_, str> {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => Cow::Owned(format!("{ns}.{}", self.name)),
            _ => Cow::Borrowed(&self.name),
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Logical-type annotation on a schema node
///
/// Consists of an identifier (e.g. `"uuid"`, `"decimal"`) and a set of
/// integral parameters (e.g. `precision`, `scale`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogicalType {
    name: String,
    params: BTreeMap<String, i64>,
}

impl LogicalType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Adds or replaces a parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: i64) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Shorthand for a `decimal` logical type with the given precision and scale
    pub fn decimal(precision: u32, scale: u32) -> Self {
        Self::new("decimal")
            .with_param("precision", i64::from(precision))
            .with_param("scale", i64::from(scale))
    }

    /// Returns the identifier the registry is consulted with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self, key: &str) -> Option<i64> {
        self.params.get(key).copied()
    }

    pub fn params(&self) -> &BTreeMap<String, i64> {
        &self.params
    }
}

/// Field of a record schema
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    schema: Schema,
    default: Option<Value>,
}

impl Field {
    /// Constructs a field with the given wire name and type
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            default: None,
        }
    }

    /// Declares a default value, used when a named record value omits this field
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the wire name of the field
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Record schema: a named, ordered list of fields
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSchema {
    name: Name,
    fields: Vec<Field>,
}

impl RecordSchema {
    pub fn new(name: impl Into<Name>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by its wire name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Enum schema: a named, ordered list of symbols
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumSchema {
    name: Name,
    symbols: Vec<String>,
}

impl EnumSchema {
    pub fn new<S: Into<String>>(
        name: impl Into<Name>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Result<Self, SchemaError> {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        let mut seen = BTreeSet::new();
        for sym in &symbols {
            if !seen.insert(sym.as_str()) {
                return Err(SchemaError::DuplicateSymbol(sym.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            symbols,
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the ordinal of a symbol given its wire name
    pub fn ordinal(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// Fixed schema: a named byte string of constant width
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedSchema {
    name: Name,
    size: usize,
}

impl FixedSchema {
    pub fn new(name: impl Into<Name>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Union schema: an ordered list of alternative branches
#[derive(Clone, Debug, PartialEq)]
pub struct UnionSchema {
    branches: Vec<Schema>,
}

impl UnionSchema {
    /// Constructs a union, rejecting nested unions and branches that share
    /// a full name.
    pub fn new(branches: Vec<Schema>) -> Result<Self, SchemaError> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for branch in &branches {
            if matches!(branch.kind(), SchemaKind::Union(_)) {
                return Err(SchemaError::NestedUnion);
            }
            let key = branch.full_name().into_owned();
            if !seen.insert(key.clone()) {
                return Err(SchemaError::DuplicateBranch(key));
            }
        }
        Ok(Self { branches })
    }

    pub fn branches(&self) -> &[Schema] {
        &self.branches
    }

    pub fn branch(&self, index: usize) -> Option<&Schema> {
        self.branches.get(index)
    }
}

/// Wire shape of a schema node
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Fixed(FixedSchema),
    Enum(EnumSchema),
    Array(Box<Schema>),
    Map(Box<Schema>),
    Union(UnionSchema),
    Record(RecordSchema),
}

impl SchemaKind {
    /// Returns the type name of this kind, as it appears in schema definitions
    pub const fn type_name(&self) -> &'static str {
        match self {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Int => "int",
            SchemaKind::Long => "long",
            SchemaKind::Float => "float",
            SchemaKind::Double => "double",
            SchemaKind::Bytes => "bytes",
            SchemaKind::String => "string",
            SchemaKind::Fixed(_) => "fixed",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Array(_) => "array",
            SchemaKind::Map(_) => "map",
            SchemaKind::Union(_) => "union",
            SchemaKind::Record(_) => "record",
        }
    }

    /// Returns the [`Name`] of a named kind
    pub fn name(&self) -> Option<&Name> {
        match self {
            SchemaKind::Fixed(s) => Some(s.name()),
            SchemaKind::Enum(s) => Some(s.name()),
            SchemaKind::Record(s) => Some(s.name()),
            _ => None,
        }
    }
}

/// A node of the schema graph
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    logical_type: Option<LogicalType>,
}

impl From<SchemaKind> for Schema {
    fn from(kind: SchemaKind) -> Self {
        Self {
            kind,
            logical_type: None,
        }
    }
}

macro_rules! primitive_ctors {
    ( $( $f:ident => $k:ident ),+ $(,)? ) => {
        $(
            #[doc = concat!("Constructs an unannotated `", stringify!($f), "` schema")]
            #[must_use]
            pub fn $f() -> Self {
                SchemaKind::$k.into()
            }
        )+
    };
}

impl Schema {
    primitive_ctors! {
        null => Null,
        boolean => Boolean,
        int => Int,
        long => Long,
        float => Float,
        double => Double,
        bytes => Bytes,
        string => String,
    }

    pub fn fixed(name: impl Into<Name>, size: usize) -> Self {
        SchemaKind::Fixed(FixedSchema::new(name, size)).into()
    }

    pub fn enumeration<S: Into<String>>(
        name: impl Into<Name>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Result<Self, SchemaError> {
        Ok(SchemaKind::Enum(EnumSchema::new(name, symbols)?).into())
    }

    pub fn array(items: Schema) -> Self {
        SchemaKind::Array(Box::new(items)).into()
    }

    pub fn map(values: Schema) -> Self {
        SchemaKind::Map(Box::new(values)).into()
    }

    pub fn union(branches: Vec<Schema>) -> Result<Self, SchemaError> {
        Ok(SchemaKind::Union(UnionSchema::new(branches)?).into())
    }

    pub fn record(name: impl Into<Name>, fields: Vec<Field>) -> Self {
        SchemaKind::Record(RecordSchema::new(name, fields)).into()
    }

    /// Attaches a logical-type annotation to `self`
    #[must_use]
    pub fn with_logical_type(mut self, logical: LogicalType) -> Self {
        self.logical_type = Some(logical);
        self
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    pub fn logical_type(&self) -> Option<&LogicalType> {
        self.logical_type.as_ref()
    }

    /// Returns the full name of a named schema, or the type name of any other
    pub fn full_name(&self) -> Cow<'_, str> {
        match self.kind.name() {
            Some(name) => name.full_name(),
            None => Cow::Borrowed(self.kind.type_name()),
        }
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())
    }
}
