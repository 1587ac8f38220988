//! Schema-directed read path
//!
//! [`DatumReader`] is the inverse of [`DatumWriter`](crate::write::DatumWriter):
//! it consumes one datum's worth of primitives from a [`Decoder`] and builds
//! the [`Value`] the schema describes. Decoded values are always in their
//! canonical shape:
//!
//! * records become [`Value::Map`], keyed by [`NameCodec::field_key`]
//! * enum ordinals become [`Value::Symbol`], unmangled
//! * fixed values become [`Value::Bytes`]
//! * arrays of unannotated `int`, `long`, `float`, `double` or `boolean`
//!   become [`Value::NumericArray`], and every other array a [`Value::Array`]
//!
//! Nodes with a registered logical type are passed through the conversion's
//! `from_wire` after their base value is decoded.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Config;
use crate::logical::LogicalTypeRegistry;
use crate::names::{Identity, NameCodec};
use crate::parse::error::DecodeResult;
use crate::parse::{BinaryDecoder, Decoder, Parser, SliceParser};
use crate::schema::{RecordSchema, Schema, SchemaKind};
use crate::value::{NumericArray, Value};

/// Reads [`Value`]s against [`Schema`]s
#[derive(Clone)]
pub struct DatumReader<'r> {
    registry: &'r LogicalTypeRegistry,
    names: Arc<dyn NameCodec>,
}

impl<'r> DatumReader<'r> {
    pub fn new(registry: &'r LogicalTypeRegistry) -> Self {
        Self {
            registry,
            names: Arc::new(Identity),
        }
    }

    /// Replaces the [`NameCodec`] used for enum symbols and record keys
    #[must_use]
    pub fn with_names(mut self, names: impl NameCodec + 'static) -> Self {
        self.names = Arc::new(names);
        self
    }

    pub fn registry(&self) -> &'r LogicalTypeRegistry {
        self.registry
    }

    /// Reads one datum of `schema` from `input`
    pub fn read(&self, schema: &Schema, input: &mut dyn Decoder) -> DecodeResult<Value> {
        let base = self.read_base(schema, input)?;
        match self.registry.conversion_for(schema) {
            Some(conversion) if !base.is_null() => Ok(conversion.from_wire(base, schema)?),
            _ => Ok(base),
        }
    }

    /// Reads one datum of `schema`, or returns `None` if `input` is exhausted
    pub fn read_next(&self, schema: &Schema, input: &mut dyn Decoder) -> DecodeResult<Option<Value>> {
        if input.is_exhausted() {
            return Ok(None);
        }
        self.read(schema, input).map(Some)
    }

    /// Iterates over consecutive datums of `schema` until `input` is exhausted.
    ///
    /// Iteration stops after the first error.
    pub fn values<'a, D: Decoder>(&'a self, schema: &'a Schema, input: D) -> Values<'a, 'r, D> {
        Values {
            reader: self,
            schema,
            input,
            failed: false,
        }
    }

    /// Reads a single datum of `schema` that spans `bytes`
    pub fn from_slice(&self, schema: &Schema, bytes: &[u8]) -> DecodeResult<Value> {
        let mut input = BinaryDecoder::new(SliceParser::new(bytes));
        let value = self.read(schema, &mut input)?;
        #[cfg(feature = "check_complete_parse")]
        if !input.is_exhausted() {
            return Err(crate::parse::error::DecodeError::Leftover {
                residual: input.get_ref().remainder(),
            });
        }
        #[cfg(not(feature = "check_complete_parse"))]
        if !input.is_exhausted() {
            tracing::debug!(residual = input.get_ref().remainder(), "ignoring trailing bytes");
        }
        Ok(value)
    }

    fn read_base(&self, schema: &Schema, input: &mut dyn Decoder) -> DecodeResult<Value> {
        let value = match schema.kind() {
            SchemaKind::Null => {
                input.read_null()?;
                Value::Null
            }
            SchemaKind::Boolean => Value::Boolean(input.read_boolean()?),
            SchemaKind::Int => Value::Int(input.read_int()?),
            SchemaKind::Long => Value::Long(input.read_long()?),
            SchemaKind::Float => Value::Float(input.read_float()?),
            SchemaKind::Double => Value::Double(input.read_double()?),
            SchemaKind::Bytes => Value::Bytes(input.read_bytes()?),
            SchemaKind::String => Value::String(input.read_string()?),
            SchemaKind::Fixed(fixed) => Value::Bytes(input.read_fixed(fixed.size())?),
            SchemaKind::Enum(enumeration) => {
                let ordinal = input.read_enum(enumeration.symbols().len())?;
                let symbol = &enumeration.symbols()[ordinal];
                Value::Symbol(self.names.unmangle(symbol).into_owned())
            }
            SchemaKind::Array(items) => self.read_array(items, input)?,
            SchemaKind::Map(values) => {
                let mut entries = BTreeMap::new();
                let mut count = input.read_map_start()?;
                while count > 0 {
                    for _ in 0..count {
                        let key = input.read_string()?;
                        let item = self.read(values, input)?;
                        entries.insert(key, item);
                    }
                    count = input.map_next()?;
                }
                Value::Map(entries)
            }
            SchemaKind::Union(union) => {
                let index = input.read_index(union.branches().len())?;
                let branch = &union.branches()[index];
                tracing::trace!(index, branch = %branch, "reading union branch");
                self.read(branch, input)?
            }
            SchemaKind::Record(record) => self.read_record(record, input)?,
        };
        Ok(value)
    }

    fn read_record(&self, record: &RecordSchema, input: &mut dyn Decoder) -> DecodeResult<Value> {
        let mut entries = BTreeMap::new();
        for field in record.fields() {
            let item = self.read(field.schema(), input)?;
            entries.insert(self.names.field_key(field).into_owned(), item);
        }
        Ok(Value::Map(entries))
    }

    fn read_array(&self, items: &Schema, input: &mut dyn Decoder) -> DecodeResult<Value> {
        if items.logical_type().is_some() {
            return self.read_items(input, |d| self.read(items, d)).map(Value::Array);
        }
        let value: Value = match items.kind() {
            SchemaKind::Int => NumericArray::Int(self.read_items(input, |d| Ok(d.read_int()?))?).into(),
            SchemaKind::Long => NumericArray::Long(self.read_items(input, |d| Ok(d.read_long()?))?).into(),
            SchemaKind::Float => NumericArray::Float(self.read_items(input, |d| Ok(d.read_float()?))?).into(),
            SchemaKind::Double => NumericArray::Double(self.read_items(input, |d| Ok(d.read_double()?))?).into(),
            SchemaKind::Boolean => {
                NumericArray::Boolean(self.read_items(input, |d| Ok(d.read_boolean()?))?).into()
            }
            _ => Value::Array(self.read_items(input, |d| self.read(items, d))?),
        };
        Ok(value)
    }

    fn read_items<T>(
        &self,
        input: &mut dyn Decoder,
        mut read_one: impl FnMut(&mut dyn Decoder) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        let mut acc = Vec::new();
        let mut count = input.read_array_start()?;
        while count > 0 {
            for _ in 0..count {
                acc.push(read_one(&mut *input)?);
            }
            count = input.array_next()?;
        }
        Ok(acc)
    }
}

impl DatumReader<'static> {
    /// Creates a reader honoring the conversions and naming of `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            registry: config.registry(),
            names: config.name_codec(),
        }
    }
}

impl Default for DatumReader<'static> {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl std::fmt::Debug for DatumReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatumReader")
            .field("registry", self.registry)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`DatumReader::values`]
pub struct Values<'a, 'r, D> {
    reader: &'a DatumReader<'r>,
    schema: &'a Schema,
    input: D,
    failed: bool,
}

impl<D> Values<'_, '_, D> {
    pub fn into_inner(self) -> D {
        self.input
    }
}

impl<D: Decoder> Iterator for Values<'_, '_, D> {
    type Item = DecodeResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.reader.read_next(self.schema, &mut self.input).transpose();
        self.failed = matches!(next, Some(Err(_)));
        next
    }
}
