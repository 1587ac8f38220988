//! Record field resolution
//!
//! A record value is either *positional*, an ordered sequence holding one
//! element per declared field, or *named*, a keyed mapping looked up by field.
//! Either way, fields are written in declared order.
//!
//! Named values are looked up through [`NameCodec::field_key`], and a key
//! counts as declared only when it is the field key of some field. In [`ValidationMode::Checked`], undeclared keys fail the write. Declared
//! fields missing from the value fall back to the field default, then to
//! null.
//!
//! [`NameCodec::field_key`]: crate::names::NameCodec::field_key

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use super::DatumWriter;
use crate::conv::Encoder;
use crate::error::{EncodeError, EncodeResult, LengthError, MismatchKind};
use crate::schema::{Field, RecordSchema, Schema};
use crate::value::{ValidationMode, Value};

static NULL: Value = Value::Null;

fn write_field(
    writer: &DatumWriter<'_>,
    field: &Field,
    value: &Value,
    out: &mut dyn Encoder,
    mode: ValidationMode,
) -> EncodeResult<()> {
    writer
        .write_in(field.schema(), value, out, mode)
        .map_err(|err| err.annotate_null(format_args!("in field {}", field.name())))
}

fn check_arity(schema: &Schema, record: &RecordSchema, value: &Value, actual: usize) -> EncodeResult<()> {
    let exact = record.fields().len();
    if actual == exact {
        Ok(())
    } else {
        Err(EncodeError::mismatch(
            schema.full_name(),
            value,
            LengthError::WrongLength { exact, actual },
        ))
    }
}

/// Keys under which a named value of `record` may hold its fields
pub(super) fn declared_keys<'a>(writer: &DatumWriter<'_>, record: &'a RecordSchema) -> BTreeSet<Cow<'a, str>> {
    record
        .fields()
        .iter()
        .map(|field| writer.names().field_key(field))
        .collect()
}

/// Keys of `entries` that do not name a declared field, in sorted order
fn undeclared_keys(writer: &DatumWriter<'_>, record: &RecordSchema, entries: &BTreeMap<String, Value>) -> Vec<String> {
    let declared = declared_keys(writer, record);
    entries
        .keys()
        .filter(|key| !declared.contains(key.as_str()))
        .cloned()
        .collect()
}

fn write_fields(
    writer: &DatumWriter<'_>,
    schema: &Schema,
    record: &RecordSchema,
    value: &Value,
    out: &mut dyn Encoder,
    mode: ValidationMode,
) -> EncodeResult<()> {
    match value {
        Value::Array(items) => {
            check_arity(schema, record, value, items.len())?;
            tracing::trace!(record = %schema, "writing positional record");
            for (field, item) in record.fields().iter().zip(items) {
                write_field(writer, field, item, out, mode)?;
            }
            Ok(())
        }
        Value::NumericArray(items) => {
            check_arity(schema, record, value, items.len())?;
            tracing::trace!(record = %schema, "writing positional record");
            for (field, item) in record.fields().iter().zip(items.values()) {
                write_field(writer, field, &item, out, mode)?;
            }
            Ok(())
        }
        Value::Map(entries) => {
            if mode.is_checked() {
                let undeclared = undeclared_keys(writer, record, entries);
                if !undeclared.is_empty() {
                    return Err(EncodeError::mismatch(
                        schema.full_name(),
                        value,
                        MismatchKind::UndeclaredFields(undeclared),
                    ));
                }
            }
            tracing::trace!(record = %schema, ?mode, "writing named record");
            for field in record.fields() {
                let key = writer.names().field_key(field);
                let item = entries
                    .get(&*key)
                    .or_else(|| field.default())
                    .unwrap_or(&NULL);
                write_field(writer, field, item, out, mode)?;
            }
            Ok(())
        }
        _ => Err(EncodeError::mismatch(
            schema.full_name(),
            value,
            MismatchKind::WrongType { expected: "record" },
        )),
    }
}

pub(super) fn write_record(
    writer: &DatumWriter<'_>,
    schema: &Schema,
    record: &RecordSchema,
    value: &Value,
    out: &mut dyn Encoder,
    mode: ValidationMode,
) -> EncodeResult<()> {
    write_fields(writer, schema, record, value, out, mode)
        .map_err(|err| err.annotate_null(format_args!("of {}", record.name().full_name())))
}
