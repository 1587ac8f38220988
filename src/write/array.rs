//! Array encoding strategies
//!
//! A [`NumericArray`] whose element type has exactly the array's width, and
//! whose element schema carries no logical type, is written with one block
//! call on the encoder. Every other array value is written element by
//! element through the dispatcher. Both strategies produce identical bytes
//! for identical elements.

use std::borrow::Cow;

use super::DatumWriter;
use crate::conv::Encoder;
use crate::error::{EncodeError, EncodeResult, MismatchKind};
use crate::schema::{Schema, SchemaKind};
use crate::value::{NumericArray, ValidationMode, Value};

/// Returns `true` if `arr` can be written against `items` without per-element dispatch
pub(crate) fn is_bulk_eligible(items: &Schema, arr: &NumericArray) -> bool {
    items.logical_type().is_none()
        && matches!(
            (items.kind(), arr),
            (SchemaKind::Int, NumericArray::Int(_))
                | (SchemaKind::Long, NumericArray::Long(_))
                | (SchemaKind::Float, NumericArray::Float(_))
                | (SchemaKind::Double, NumericArray::Double(_))
                | (SchemaKind::Boolean, NumericArray::Boolean(_))
        )
}

fn write_bulk(arr: &NumericArray, out: &mut dyn Encoder) {
    out.write_array_start();
    out.set_item_count(arr.len());
    match arr {
        NumericArray::Int(items) => out.write_int_block(items),
        NumericArray::Long(items) => out.write_long_block(items),
        NumericArray::Float(items) => out.write_float_block(items),
        NumericArray::Double(items) => out.write_double_block(items),
        NumericArray::Boolean(items) => out.write_boolean_block(items),
    }
    out.write_array_end();
}

fn write_generic<'v, I>(
    writer: &DatumWriter<'_>,
    items_schema: &Schema,
    items: I,
    len: usize,
    out: &mut dyn Encoder,
    mode: ValidationMode,
) -> EncodeResult<()>
where
    I: Iterator<Item = Cow<'v, Value>>,
{
    out.write_array_start();
    out.set_item_count(len);
    for item in items {
        out.start_item();
        writer.write_in(items_schema, &item, out, mode)?;
    }
    out.write_array_end();
    Ok(())
}

pub(super) fn write_array(
    writer: &DatumWriter<'_>,
    schema: &Schema,
    items_schema: &Schema,
    value: &Value,
    out: &mut dyn Encoder,
    mode: ValidationMode,
) -> EncodeResult<()> {
    match value {
        Value::NumericArray(arr) if is_bulk_eligible(items_schema, arr) => {
            tracing::trace!(len = arr.len(), "writing array in bulk");
            write_bulk(arr, out);
            Ok(())
        }
        Value::NumericArray(arr) => {
            tracing::trace!(len = arr.len(), elements = %items_schema, "numeric array not bulk-eligible, writing elements");
            write_generic(writer, items_schema, arr.values().map(Cow::Owned), arr.len(), out, mode)
        }
        Value::Array(items) => {
            tracing::trace!(len = items.len(), "writing array elements");
            write_generic(writer, items_schema, items.iter().map(Cow::Borrowed), items.len(), out, mode)
        }
        _ => Err(EncodeError::mismatch(
            schema.full_name(),
            value,
            MismatchKind::WrongType { expected: "array" },
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::logical::LogicalTypeRegistry;
    use crate::schema::LogicalType;

    #[test]
    fn eligibility() {
        let ints = NumericArray::Int(vec![1, 2]);
        assert!(is_bulk_eligible(&Schema::int(), &ints));
        assert!(!is_bulk_eligible(&Schema::long(), &ints));
        let dated = Schema::int().with_logical_type(LogicalType::new("date"));
        assert!(!is_bulk_eligible(&dated, &ints));
    }

    #[test]
    fn widened_numeric_array_takes_generic_path() {
        let writer = DatumWriter::new(LogicalTypeRegistry::standard());
        let schema = Schema::array(Schema::long());
        let bulk = Value::NumericArray(NumericArray::Int(vec![1, -1, 300]));
        let generic = Value::Array(vec![Value::Long(1), Value::Long(-1), Value::Long(300)]);
        assert_eq!(
            writer.to_bytes(&schema, &bulk).unwrap(),
            writer.to_bytes(&schema, &generic).unwrap()
        );
    }

    #[test]
    fn empty_arrays_have_only_terminator() {
        let writer = DatumWriter::new(LogicalTypeRegistry::standard());
        let schema = Schema::array(Schema::double());
        let empty = Value::NumericArray(NumericArray::Double(vec![]));
        assert_eq!(writer.to_bytes(&schema, &empty).unwrap(), vec![0x00]);
        assert_eq!(writer.to_bytes(&schema, &Value::Array(vec![])).unwrap(), vec![0x00]);
    }

    #[test]
    fn non_sequences_rejected() {
        let writer = DatumWriter::new(LogicalTypeRegistry::standard());
        let err = writer
            .to_bytes(&Schema::array(Schema::int()), &Value::Int(1))
            .unwrap_err();
        assert_eq!(
            err.mismatch_kind(),
            Some(&MismatchKind::WrongType { expected: "array" })
        );
    }
}
