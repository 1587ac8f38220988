//! Schema-directed write path
//!
//! [`DatumWriter`] maps one [`Value`] onto one [`Schema`] node, validating
//! the value against the node's structural contract and emitting the
//! corresponding primitive calls on an [`Encoder`]. Composite nodes recurse,
//! with the validation mode passed down explicitly so that a
//! [`Value::Annotated`] override only ever affects its own subtree.
//!
//! The strategy choices that do not depend on the schema kind alone live in
//! their own submodules: [`record`] (positional vs. named record values),
//! [`array`] (bulk vs. generic array encoding) and [`union`] (branch
//! selection). Numeric casts live in [`cast`].

mod array;
mod cast;
mod record;
mod union;

use std::sync::Arc;

use crate::config::Config;
use crate::conv::{BinaryEncoder, Encoder};
use crate::error::{EncodeError, EncodeResult, MismatchKind, WidthError};
use crate::logical::LogicalTypeRegistry;
use crate::names::{Identity, NameCodec};
use crate::schema::{Schema, SchemaKind};
use crate::value::{ValidationMode, Value};

/// Writes [`Value`]s against [`Schema`]s
///
/// A `DatumWriter` holds no per-write state and can be shared freely between
/// threads.
#[derive(Clone)]
pub struct DatumWriter<'r> {
    registry: &'r LogicalTypeRegistry,
    names: Arc<dyn NameCodec>,
    mode: ValidationMode,
}

impl<'r> DatumWriter<'r> {
    /// Creates a writer that uses the conversions of `registry`, writes names
    /// unchanged, and checks named records strictly
    pub fn new(registry: &'r LogicalTypeRegistry) -> Self {
        Self {
            registry,
            names: Arc::new(Identity),
            mode: ValidationMode::default(),
        }
    }

    /// Replaces the [`NameCodec`] used for enum symbols and record keys
    #[must_use]
    pub fn with_names(mut self, names: impl NameCodec + 'static) -> Self {
        self.names = Arc::new(names);
        self
    }

    /// Replaces the default validation mode
    #[must_use]
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn registry(&self) -> &'r LogicalTypeRegistry {
        self.registry
    }

    pub(crate) fn names(&self) -> &dyn NameCodec {
        self.names.as_ref()
    }

    /// Writes `value` against `schema` under the default validation mode
    pub fn write(&self, schema: &Schema, value: &Value, out: &mut dyn Encoder) -> EncodeResult<()> {
        self.write_in(schema, value, out, self.mode)
    }

    /// Writes `value` against `schema` under `mode`, for this call only
    pub fn write_with_mode(
        &self,
        schema: &Schema,
        value: &Value,
        out: &mut dyn Encoder,
        mode: ValidationMode,
    ) -> EncodeResult<()> {
        self.write_in(schema, value, out, mode)
    }

    /// Encodes `value` into a fresh buffer
    pub fn to_bytes(&self, schema: &Schema, value: &Value) -> EncodeResult<Vec<u8>> {
        let mut enc = BinaryEncoder::new();
        self.write(schema, value, &mut enc)?;
        Ok(enc.into_inner())
    }

    /// Computes the length of the encoding of `value` without storing it
    pub fn encoded_len(&self, schema: &Schema, value: &Value) -> EncodeResult<usize> {
        let mut enc = BinaryEncoder::counter();
        self.write(schema, value, &mut enc)?;
        Ok(enc.bytes_written())
    }

    pub(crate) fn write_in(
        &self,
        schema: &Schema,
        value: &Value,
        out: &mut dyn Encoder,
        mode: ValidationMode,
    ) -> EncodeResult<()> {
        if let Value::Annotated(inner_mode, inner) = value {
            if *inner_mode != mode {
                tracing::trace!(schema = %schema, from = ?mode, to = ?inner_mode, "rebinding validation mode");
            }
            return self.write_in(schema, inner, out, *inner_mode);
        }

        if let (false, Some(logical)) = (value.is_null(), schema.logical_type()) {
            match self.registry.lookup(logical.name()) {
                Some(conversion) => {
                    tracing::trace!(logical = logical.name(), "applying logical conversion");
                    let wire = conversion.to_wire(value, schema)?;
                    return self.write_base(schema, &wire, out, mode);
                }
                None => {
                    tracing::trace!(logical = logical.name(), "no conversion registered, writing base type");
                }
            }
        }

        self.write_base(schema, value, out, mode)
    }

    fn write_base(
        &self,
        schema: &Schema,
        value: &Value,
        out: &mut dyn Encoder,
        mode: ValidationMode,
    ) -> EncodeResult<()> {
        let mismatch = |kind: MismatchKind| EncodeError::mismatch(schema.full_name(), value, kind);

        match (schema.kind(), value) {
            (SchemaKind::Null, Value::Null) | (SchemaKind::Union(_), _) => {}
            (SchemaKind::Null, _) => return Err(mismatch(MismatchKind::NotNull)),
            (_, Value::Null) => return Err(EncodeError::null_of(schema.full_name())),
            _ => {}
        }

        match schema.kind() {
            SchemaKind::Null => out.write_null(),
            SchemaKind::Boolean => out.write_boolean(cast::to_boolean(value).map_err(mismatch)?),
            SchemaKind::Int => out.write_int(cast::to_int(value).map_err(mismatch)?),
            SchemaKind::Long => out.write_long(cast::to_long(value).map_err(mismatch)?),
            SchemaKind::Float => out.write_float(cast::to_float(value).map_err(mismatch)?),
            SchemaKind::Double => out.write_double(cast::to_double(value).map_err(mismatch)?),
            SchemaKind::Bytes => match value.byte_like() {
                Some(bytes) => bytes.emit_variable(out),
                None => return Err(mismatch(MismatchKind::WrongType { expected: "bytes" })),
            },
            SchemaKind::Fixed(fixed) => match value.byte_like() {
                Some(bytes) if bytes.byte_len() == fixed.size() => bytes.emit_fixed(out),
                Some(bytes) => {
                    return Err(mismatch(
                        WidthError::WrongWidth {
                            exact: fixed.size(),
                            actual: bytes.byte_len(),
                        }
                        .into(),
                    ))
                }
                None => return Err(mismatch(MismatchKind::WrongType { expected: "bytes" })),
            },
            SchemaKind::String => match value.as_name() {
                Some(text) => out.write_string(text),
                None => return Err(mismatch(MismatchKind::WrongType { expected: "string" })),
            },
            SchemaKind::Enum(enumeration) => {
                let symbol = value
                    .as_name()
                    .ok_or_else(|| mismatch(MismatchKind::WrongType { expected: "symbol" }))?;
                match enumeration.ordinal(&self.names.mangle(symbol)) {
                    Some(ordinal) => out.write_enum(ordinal),
                    None => return Err(mismatch(MismatchKind::UnknownSymbol(symbol.to_owned()))),
                }
            }
            SchemaKind::Array(items) => array::write_array(self, schema, items, value, out, mode)?,
            SchemaKind::Map(values) => {
                let Value::Map(entries) = value else {
                    return Err(mismatch(MismatchKind::WrongType { expected: "map" }));
                };
                out.write_map_start();
                out.set_item_count(entries.len());
                for (key, item) in entries {
                    out.start_item();
                    out.write_string(key);
                    self.write_in(values, item, out, mode)?;
                }
                out.write_map_end();
            }
            SchemaKind::Union(union) => {
                let Some(index) = union::select_branch(self, union, value) else {
                    return Err(mismatch(MismatchKind::NoMatchingBranch));
                };
                let branch = &union.branches()[index];
                tracing::trace!(index, branch = %branch, "selected union branch");
                out.write_index(index);
                self.write_in(branch, value, out, mode)?;
            }
            SchemaKind::Record(rec) => record::write_record(self, schema, rec, value, out, mode)?,
        }
        Ok(())
    }
}

impl DatumWriter<'static> {
    /// Creates a writer honoring `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            registry: config.registry(),
            names: config.name_codec(),
            mode: config.validation_mode(),
        }
    }
}

impl Default for DatumWriter<'static> {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl std::fmt::Debug for DatumWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatumWriter")
            .field("registry", self.registry)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
